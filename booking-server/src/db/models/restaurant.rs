//! Restaurant Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// 未配置容量时的兜底值 (座位数)
pub const DEFAULT_CAPACITY: i32 = 100;

/// Restaurant ID type
pub type RestaurantId = RecordId;

/// Restaurant entity (餐厅)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RestaurantId>,
    /// Owner reference (manager 角色)
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub cuisine: String,
    /// 价位等级 1-5
    pub cost_rating: i32,
    pub description: String,
    /// 每个时段的容量上限
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    /// 仅 admin 可设置；未批准的餐厅对 customer 不可见
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_approved: bool,
}

fn default_capacity() -> i32 {
    DEFAULT_CAPACITY
}

/// Create restaurant payload (owner 强制为当前用户)
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub cuisine: String,
    pub cost_rating: i32,
    pub description: String,
    pub capacity: Option<i32>,
}

/// Update restaurant payload
///
/// is_approved 不在这里：批准走单独的 admin 接口。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub cost_rating: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
}
