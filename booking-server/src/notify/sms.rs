//! 短信渠道
//!
//! 号码统一成 E.164 形式后经 HTTP 网关发送，
//! 未配置 SMS_API_URL 时静默跳过。

use serde::Serialize;

use super::NotifyConfig;

/// 规整成 E.164 形式：去掉分隔符，保证 '+' 前缀
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("+{}", digits)
}

#[derive(Serialize)]
struct SmsPayload<'a> {
    from: &'a str,
    to: &'a str,
    body: &'a str,
}

pub async fn send(
    client: &reqwest::Client,
    config: &NotifyConfig,
    to: &str,
    body: &str,
) -> anyhow::Result<()> {
    let Some(url) = &config.sms_api_url else {
        tracing::debug!(target: "notify", to, "sms gateway not configured, skipping");
        return Ok(());
    };

    let payload = SmsPayload {
        from: &config.sms_from,
        to,
        body,
    };

    let response = client.post(url).json(&payload).send().await?;
    response.error_for_status()?;

    tracing::info!(target: "notify", to, "sms sent");
    Ok(())
}
