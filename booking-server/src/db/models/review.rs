//! Review Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Review ID type
pub type ReviewId = RecordId;

/// Review entity (评价)
///
/// 每个 (customer, restaurant) 只允许一条评价，在创建校验时检查。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReviewId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    /// 评分 1-5
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Create review payload (customer 强制为当前用户)
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Update review payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewUpdate {
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
}
