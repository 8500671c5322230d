//! 统一错误处理
//!
//! 提供应用级错误类型，HTTP 响应统一使用 [`shared::ApiResponse`] 信封，
//! 错误码见 [`shared::ErrorCode`]。
//!
//! # 错误分类
//!
//! | 分类 | 说明 |
//! |------|------|
//! | 认证错误 | 未登录、令牌过期、无效令牌 |
//! | 授权错误 | 角色/所有权不满足 |
//! | 校验错误 | 字段取值、日期、容量 |
//! | 系统错误 | 数据库错误、内部错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Booking"))
//!
//! // 返回成功响应
//! Ok(ok(data))
//! ```

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::{ApiResponse, ErrorCode};
use tracing::error;

/// 应用错误
///
/// 每个变体对应一个 [`ErrorCode`]，HTTP 状态码由错误码决定。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // ========== 授权错误 (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== 业务校验错误 (400/404/409) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 带资源专用错误码的 not found (booking/restaurant/review)
    #[error("{message}")]
    ResourceNotFound {
        code: ErrorCode,
        message: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// 字段级校验失败，携带字段名方便客户端定位
    #[error("{field}: {message}")]
    FieldValidation {
        field: &'static str,
        message: String,
        code: ErrorCode,
    },

    #[error("Resource already exists: {0}")]
    Conflict(String),

    // ========== 系统错误 (500) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 错误对应的统一错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized => ErrorCode::NotAuthenticated,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::TokenExpired => ErrorCode::TokenExpired,
            AppError::InvalidToken(_) => ErrorCode::TokenInvalid,
            AppError::Forbidden(_) => ErrorCode::PermissionDenied,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::ResourceNotFound { code, .. } => *code,
            AppError::Validation(_) => ErrorCode::ValidationFailed,
            AppError::FieldValidation { code, .. } => *code,
            AppError::Conflict(_) => ErrorCode::AlreadyExists,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    // ========== Helper Constructors ==========

    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        AppError::NotFound(format!("{} not found", r))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn booking_not_found() -> Self {
        AppError::ResourceNotFound {
            code: ErrorCode::BookingNotFound,
            message: ErrorCode::BookingNotFound.message().to_string(),
        }
    }

    pub fn restaurant_not_found() -> Self {
        AppError::ResourceNotFound {
            code: ErrorCode::RestaurantNotFound,
            message: ErrorCode::RestaurantNotFound.message().to_string(),
        }
    }

    pub fn review_not_found() -> Self {
        AppError::ResourceNotFound {
            code: ErrorCode::ReviewNotFound,
            message: ErrorCode::ReviewNotFound.message().to_string(),
        }
    }

    /// 字段级校验错误，使用错误码的默认消息
    pub fn field(field: &'static str, code: ErrorCode) -> Self {
        AppError::FieldValidation {
            field,
            message: code.message().to_string(),
            code,
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        AppError::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        AppError::InvalidToken(msg.into())
    }

    pub fn unauthorized() -> Self {
        AppError::Unauthorized
    }

    pub fn token_expired() -> Self {
        AppError::TokenExpired
    }

    /// 统一的登录失败错误，避免用户名枚举
    pub fn invalid_credentials() -> Self {
        AppError::InvalidCredentials
    }
}

impl From<crate::db::repository::RepoError> for AppError {
    fn from(err: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        // 5xx: 记录细节但不向客户端暴露
        let message = match &self {
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                code.message().to_string()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                code.message().to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ApiResponse::<()>::error(code, message));
        (code.http_status(), body).into_response()
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok_with_message(data, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn error_codes_map_to_status() {
        assert_eq!(
            AppError::unauthorized().code().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("nope").code().http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found("Booking").code().http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::field("party_size", ErrorCode::PartySizeOutOfRange)
                .code()
                .http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::database("table scan exploded");
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        // 细节只进日志，对外是默认消息
        assert_eq!(err.code().message(), "Database error");
    }
}
