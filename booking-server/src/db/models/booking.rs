//! Booking Model

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;

/// Booking ID type
pub type BookingId = RecordId;

/// 预订状态
///
/// 容量统计只计入 pending 和 confirmed 两种状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// 该状态是否占用时段容量
    pub fn holds_capacity(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BookingId>,
    /// Customer reference (创建时强制为当前用户)
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    /// Restaurant reference
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub date: NaiveDate,
    #[serde(with = "serde_helpers::flexible_time")]
    pub time: NaiveTime,
    pub party_size: i32,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create booking payload
///
/// customer 和 status 不可由客户端指定。
#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub date: NaiveDate,
    #[serde(with = "serde_helpers::flexible_time")]
    pub time: NaiveTime,
    pub party_size: i32,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Update booking payload (partial)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingUpdate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub restaurant: Option<RecordId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "serde_helpers::option_flexible_time")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub party_size: Option<i32>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl BookingUpdate {
    /// 是否改动了时段相关字段 (restaurant/date/time/party_size)
    pub fn touches_slot(&self) -> bool {
        self.restaurant.is_some()
            || self.date.is_some()
            || self.time.is_some()
            || self.party_size.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_capacity_rules() {
        assert!(BookingStatus::Pending.holds_capacity());
        assert!(BookingStatus::Confirmed.holds_capacity());
        assert!(!BookingStatus::Cancelled.holds_capacity());
        assert!(!BookingStatus::Completed.holds_capacity());
    }

    #[test]
    fn update_slot_detection() {
        let update = BookingUpdate {
            email: Some("a@b.c".into()),
            ..Default::default()
        };
        assert!(!update.touches_slot());

        let update = BookingUpdate {
            party_size: Some(4),
            ..Default::default()
        };
        assert!(update.touches_slot());
    }

    #[test]
    fn create_payload_accepts_short_time() {
        let payload: BookingCreate = serde_json::from_str(
            r#"{"restaurant": "restaurant:one", "date": "2030-06-01", "time": "19:00", "party_size": 4}"#,
        )
        .unwrap();
        assert_eq!(payload.time.to_string(), "19:00:00");
        assert_eq!(payload.restaurant.to_string(), "restaurant:one");
    }
}
