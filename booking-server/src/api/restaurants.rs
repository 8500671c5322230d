//! Restaurant Routes
//!
//! 餐厅的 CRUD、批准和公开搜索。

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use shared::{ApiResponse, ErrorCode};
use surrealdb::RecordId;

use super::parse_id;
use crate::AppError;
use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use crate::db::repository::{RestaurantFilter, RestaurantRepository};
use crate::security_log;
use crate::utils::{AppResult, ok, ok_with_message};

/// Build restaurant router (全部需要认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants", get(list).post(create))
        .route("/api/restaurants/search", get(search))
        .route(
            "/api/restaurants/{id}",
            get(get_one).put(update).delete(remove),
        )
        .route("/api/restaurants/{id}/approve", patch(approve))
}

async fn load_restaurant(state: &ServerState, raw_id: &str) -> AppResult<(RecordId, Restaurant)> {
    let id = parse_id("restaurant", raw_id)?;
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(AppError::restaurant_not_found)?;
    Ok((id, restaurant))
}

/// List restaurants (角色范围 + 过滤参数)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(filter): Query<RestaurantFilter>,
) -> AppResult<Json<ApiResponse<Vec<Restaurant>>>> {
    let scope = policy::list_scope(&user)?;
    let restaurants = RestaurantRepository::new(state.get_db())
        .find_scoped(&scope, &filter)
        .await?;
    Ok(ok(restaurants))
}

/// Location search parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Search approved restaurants by location
pub async fn search(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Restaurant>>>> {
    let restaurants = RestaurantRepository::new(state.get_db())
        .search_approved(q.city, q.state, q.zip_code)
        .await?;
    Ok(ok(restaurants))
}

/// Get a single restaurant
///
/// 未批准的餐厅只对所有者和 admin 可见。
pub async fn get_one(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let (_, restaurant) = load_restaurant(&state, &id).await?;

    if !restaurant.is_approved && !policy::can_modify_restaurant(&user, &restaurant.owner) {
        return Err(AppError::restaurant_not_found());
    }

    Ok(ok(restaurant))
}

/// Create a restaurant (manager only, 初始为未批准)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<RestaurantCreate>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    if !policy::can_create_restaurant(&user) {
        return Err(AppError::forbidden("Only managers can create restaurants"));
    }
    if !(1..=5).contains(&req.cost_rating) {
        return Err(AppError::field("cost_rating", ErrorCode::ValueOutOfRange));
    }
    if let Some(capacity) = req.capacity {
        if capacity < 1 {
            return Err(AppError::field("capacity", ErrorCode::ValueOutOfRange));
        }
    }

    let owner = user.record_id().map_err(AppError::invalid_token)?;
    let created = RestaurantRepository::new(state.get_db())
        .create(owner, req)
        .await?;

    Ok(ok_with_message(created, "Restaurant created, pending approval"))
}

/// Update a restaurant (owner or admin)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RestaurantUpdate>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let (id, restaurant) = load_restaurant(&state, &id).await?;

    if !policy::can_modify_restaurant(&user, &restaurant.owner) {
        return Err(AppError::forbidden(
            "You do not have permission to modify this restaurant",
        ));
    }
    if let Some(cost_rating) = req.cost_rating {
        if !(1..=5).contains(&cost_rating) {
            return Err(AppError::field("cost_rating", ErrorCode::ValueOutOfRange));
        }
    }
    if let Some(capacity) = req.capacity {
        if capacity < 1 {
            return Err(AppError::field("capacity", ErrorCode::ValueOutOfRange));
        }
    }

    let updated = RestaurantRepository::new(state.get_db())
        .update(&id, req)
        .await?;
    Ok(ok(updated))
}

/// Delete a restaurant (owner or admin)
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let (id, restaurant) = load_restaurant(&state, &id).await?;

    if !policy::can_modify_restaurant(&user, &restaurant.owner) {
        return Err(AppError::forbidden(
            "You do not have permission to delete this restaurant",
        ));
    }

    RestaurantRepository::new(state.get_db()).delete(&id).await?;
    Ok(ok_with_message((), "Restaurant deleted"))
}

/// Approval request payload
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub is_approved: bool,
}

/// Approve or revoke a restaurant (admin only)
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    if !policy::can_approve_restaurant(&user) {
        return Err(AppError::forbidden("Only admins can approve restaurants"));
    }

    let (id, _) = load_restaurant(&state, &id).await?;
    let updated = RestaurantRepository::new(state.get_db())
        .set_approved(&id, req.is_approved)
        .await?;

    security_log!(
        "INFO",
        "restaurant_approval",
        restaurant = id.to_string(),
        approved = req.is_approved,
        by = user.username.as_str()
    );

    Ok(ok(updated))
}
