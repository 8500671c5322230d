//! CurrentUser 提取器
//!
//! 令牌验证在 [`require_auth`](super::middleware::require_auth) 中间件
//! 完成，中间件把 [`CurrentUser`] 写入请求扩展，这里只负责取出。
//! 所有 `/api/` 路由都在中间件之后，扩展缺失意味着请求没走认证。

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::CurrentUser;

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ErrorCode, Role};

    fn request_parts() -> Parts {
        let (parts, _) = http::Request::builder()
            .uri("/api/bookings")
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn reads_user_injected_by_middleware() {
        let mut parts = request_parts();
        parts.extensions.insert(CurrentUser {
            id: "user:alice".into(),
            username: "alice".into(),
            role: Role::Customer,
        });

        let user = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn missing_user_is_unauthenticated() {
        let mut parts = request_parts();
        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotAuthenticated);
    }
}
