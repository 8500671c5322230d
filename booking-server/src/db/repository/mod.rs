//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.
//!
//! 列表查询统一接受 [`ListScope`] (基于角色的可见范围) 和各自的
//! 过滤参数结构，过滤条件全部通过参数绑定拼入 WHERE 子句。

pub mod booking;
pub mod restaurant;
pub mod review;
pub mod user;

// Re-exports
pub use booking::{BookingFilter, BookingRepository};
pub use restaurant::{RestaurantFilter, RestaurantRepository};
pub use review::{ReviewFilter, ReviewRepository};
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// 角色决定的列表可见范围
///
/// | 角色 | Booking/Review | Restaurant |
/// |------|----------------|------------|
/// | admin | All | All |
/// | manager | OwnedRestaurants | OwnedRestaurants |
/// | customer | OwnCustomer | ApprovedOnly |
#[derive(Debug, Clone)]
pub enum ListScope {
    /// 全部可见 (admin)
    All,
    /// 只见名下餐厅相关的实体 (manager)
    OwnedRestaurants(RecordId),
    /// 只见自己的实体 (customer)
    OwnCustomer(RecordId),
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
