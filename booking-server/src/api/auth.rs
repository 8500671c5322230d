//! Authentication Routes
//!
//! Handles registration, login, and current-user lookup.

use axum::{Json, Router, extract::State, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, Role};
use validator::Validate;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate};
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::{AppResult, ok};

/// Build authentication router
/// - /api/auth/login, /api/auth/register: public (no auth required)
/// - /api/auth/me: protected (requires auth)
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public routes - no auth middleware applied
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        // Protected routes - require authentication
        .route("/api/auth/me", get(me))
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information returned to clients
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            role: user.role,
            phone_number: user.phone_number,
        }
    }
}

/// Login handler
///
/// 用户不存在和密码错误返回同一个错误，避免用户名枚举；
/// 不存在时也跑一次哈希校验，抹平时间差。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let users = UserRepository::new(state.get_db());

    let user = users.find_by_username(&req.username).await?;

    let user = match user {
        Some(user) => {
            let valid = user
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !valid {
                security_log!("WARN", "login_failed", username = req.username.as_str());
                return Err(AppError::invalid_credentials());
            }
            user
        }
        None => {
            // 哑校验，让不存在的用户名走相同的耗时路径
            let _ = User::hash_password(&req.password);
            security_log!("WARN", "login_failed", username = req.username.as_str());
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    security_log!("INFO", "login_success", username = user.username.as_str());

    Ok(ok(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Registration handler
///
/// admin 账号不开放自助注册，角色只接受 customer/manager。
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    if req.role == Some(Role::Admin) {
        return Err(AppError::forbidden("Cannot self-register as admin"));
    }

    let hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let users = UserRepository::new(state.get_db());
    let user = users.create(req, hash).await?;

    security_log!("INFO", "user_registered", username = user.username.as_str());

    // 注册即登录
    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    Ok(ok(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Current user handler
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let users = UserRepository::new(state.get_db());
    let id = current
        .record_id()
        .map_err(AppError::invalid_token)?;

    let user = users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(ok(user.into()))
}
