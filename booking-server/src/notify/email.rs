//! 邮件渠道
//!
//! 通过 HTTP 网关发送，未配置 MAIL_API_URL 时静默跳过。

use serde::Serialize;

use super::NotifyConfig;

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

pub async fn send(
    client: &reqwest::Client,
    config: &NotifyConfig,
    to: &str,
    subject: &str,
    body: &str,
) -> anyhow::Result<()> {
    let Some(url) = &config.mail_api_url else {
        tracing::debug!(target: "notify", to, "mail gateway not configured, skipping");
        return Ok(());
    };

    let payload = MailPayload {
        from: &config.mail_from,
        to,
        subject,
        body,
    };

    let response = client.post(url).json(&payload).send().await?;
    response.error_for_status()?;

    tracing::info!(target: "notify", to, subject, "email sent");
    Ok(())
}
