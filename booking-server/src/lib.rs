//! Table-booking service
//!
//! # 架构概述
//!
//! 餐厅订座服务的主入口，提供以下核心功能：
//!
//! - **预订核心** (`bookings`): 可用性检查、预订校验、按时段串行化
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证和访问策略
//! - **通知** (`notify`): 邮件/短信通知（尽力而为，不影响主流程）
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、访问策略
//! ├── bookings/      # 可用性检查、校验、时段锁
//! ├── db/            # 数据库层 (models + repository)
//! ├── notify/        # 通知分发
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod bookings;
pub mod core;
pub mod db;
pub mod notify;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    utils::logger::init_logger();
    Ok(())
}
