//! 预订核心逻辑
//!
//! 三个相互配合的部分：
//! - [`SlotLocks`] - 按 (餐厅, 日期, 时间) 串行化检查+写入
//! - [`availability`] - 时段剩余容量计算
//! - [`validator`] - 预订参数校验 (固定规则顺序)

pub mod availability;
pub mod slots;
pub mod validator;

pub use availability::{Availability, check_availability};
pub use slots::SlotLocks;
pub use validator::{MAX_PARTY_SIZE, MIN_PARTY_SIZE, validate_booking};
