//! 通知分发
//!
//! 预订创建和状态变更后向客户发送邮件/短信。通知是尽力而为的
//! 副作用：网关失败只记日志，绝不影响预订请求本身的结果。

pub mod email;
pub mod sms;

use serde::{Deserialize, Serialize};

use crate::db::models::Booking;

/// 通知网关配置
///
/// 未配置网关地址的渠道直接禁用。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// 邮件网关地址 (HTTP POST)
    pub mail_api_url: Option<String>,
    /// 发件人地址
    pub mail_from: String,
    /// 短信网关地址 (HTTP POST)
    pub sms_api_url: Option<String>,
    /// 短信发送号码
    pub sms_from: String,
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        Self {
            mail_api_url: std::env::var("MAIL_API_URL").ok(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@example.com".to_string()),
            sms_api_url: std::env::var("SMS_API_URL").ok(),
            sms_from: std::env::var("SMS_FROM").unwrap_or_default(),
        }
    }
}

/// 通知分发服务
///
/// 所有发送都在独立任务里异步进行，调用方不等待结果。
#[derive(Debug, Clone)]
pub struct Notifier {
    config: NotifyConfig,
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 预订创建成功后的确认通知
    pub fn booking_created(&self, booking: &Booking, restaurant_name: &str) {
        let subject = format!("Booking received - {}", restaurant_name);
        let body = format!(
            "Your booking at {} for {} on {} at {} has been received and is pending confirmation.",
            restaurant_name,
            booking.party_size,
            booking.date,
            booking.time.format("%H:%M"),
        );
        self.dispatch(booking, subject, body);
    }

    /// 预订状态变更通知 (confirmed/cancelled/completed)
    pub fn booking_status_changed(&self, booking: &Booking, restaurant_name: &str) {
        let subject = format!("Booking {} - {}", booking.status, restaurant_name);
        let body = format!(
            "Your booking at {} on {} at {} is now {}.",
            restaurant_name,
            booking.date,
            booking.time.format("%H:%M"),
            booking.status,
        );
        self.dispatch(booking, subject, body);
    }

    /// 按预订上的联系方式分发到各渠道，任务内吞掉所有错误
    fn dispatch(&self, booking: &Booking, subject: String, body: String) {
        if let Some(to) = booking.email.clone() {
            let client = self.client.clone();
            let config = self.config.clone();
            let body = body.clone();
            tokio::spawn(async move {
                if let Err(e) = email::send(&client, &config, &to, &subject, &body).await {
                    tracing::warn!(target: "notify", channel = "email", error = %e, "notification failed");
                }
            });
        }

        if let Some(phone) = booking.phone_number.clone() {
            let client = self.client.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                let to = sms::normalize_phone(&phone);
                if let Err(e) = sms::send(&client, &config, &to, &body).await {
                    tracing::warn!(target: "notify", channel = "sms", error = %e, "notification failed");
                }
            });
        }
    }
}
