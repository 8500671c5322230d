//! Database Models
//!
//! SurrealDB 表模型。每个实体带有对应的 Create/Update payload 类型。

pub mod booking;
pub mod restaurant;
pub mod review;
pub mod serde_helpers;
pub mod user;

pub use booking::{Booking, BookingCreate, BookingStatus, BookingUpdate};
pub use restaurant::{Restaurant, RestaurantCreate, RestaurantUpdate};
pub use review::{Review, ReviewCreate, ReviewUpdate};
pub use user::{User, UserCreate};
