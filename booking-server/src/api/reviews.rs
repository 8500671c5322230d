//! Review Routes
//!
//! 评价的 CRUD 和按餐厅浏览。每个 (customer, restaurant)
//! 只允许一条评价。

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use shared::{ApiResponse, ErrorCode};
use surrealdb::RecordId;

use super::parse_id;
use crate::AppError;
use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate, ReviewUpdate};
use crate::db::repository::{ListScope, RestaurantRepository, ReviewFilter, ReviewRepository};
use crate::utils::{AppResult, ok, ok_with_message};

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;

/// Build review router (全部需要认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reviews", get(list).post(create))
        .route("/api/reviews/restaurant", get(restaurant_reviews))
        .route(
            "/api/reviews/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn load_review(state: &ServerState, raw_id: &str) -> AppResult<(RecordId, Review)> {
    let id = parse_id("review", raw_id)?;
    let review = ReviewRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(AppError::review_not_found)?;
    Ok((id, review))
}

fn check_rating(rating: i32) -> AppResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::field("rating", ErrorCode::RatingOutOfRange));
    }
    Ok(())
}

/// List reviews (角色范围 + 过滤参数)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(filter): Query<ReviewFilter>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let scope = policy::list_scope(&user)?;
    let reviews = ReviewRepository::new(state.get_db())
        .find_scoped(&scope, &filter)
        .await?;
    Ok(ok(reviews))
}

/// Restaurant reviews query parameters
#[derive(Debug, Deserialize)]
pub struct RestaurantReviewsQuery {
    pub restaurant_id: Option<String>,
}

/// Browse all reviews of one restaurant
///
/// 浏览用接口，不做角色范围过滤；未批准的餐厅对非 staff 不可见。
pub async fn restaurant_reviews(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(q): Query<RestaurantReviewsQuery>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let raw = q
        .restaurant_id
        .ok_or_else(|| AppError::field("restaurant_id", ErrorCode::RequiredField))?;
    let restaurant_id = parse_id("restaurant", &raw)?;

    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&restaurant_id)
        .await?
        .ok_or_else(AppError::restaurant_not_found)?;
    if !restaurant.is_approved && !user.is_staff() {
        return Err(AppError::restaurant_not_found());
    }

    let reviews = ReviewRepository::new(state.get_db())
        .find_by_restaurant(&ListScope::All, &restaurant_id)
        .await?;
    Ok(ok(reviews))
}

/// Get a single review
pub async fn get_one(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let (_, review) = load_review(&state, &id).await?;
    Ok(ok(review))
}

/// Create a review (customer 强制为当前用户)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ReviewCreate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    check_rating(req.rating)?;

    // 只能评价已批准的餐厅
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&req.restaurant)
        .await?
        .ok_or_else(AppError::restaurant_not_found)?;
    if !restaurant.is_approved {
        return Err(AppError::restaurant_not_found());
    }

    let customer = user.record_id().map_err(AppError::invalid_token)?;
    let created = ReviewRepository::new(state.get_db())
        .create(customer, req)
        .await
        .map_err(|e| match e {
            // 重复评价用专用错误码而不是通用冲突
            crate::db::repository::RepoError::Duplicate(_) => {
                AppError::field("restaurant", ErrorCode::DuplicateReview)
            }
            other => other.into(),
        })?;

    Ok(ok_with_message(created, "Review created"))
}

/// Update a review (owner or admin)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ReviewUpdate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let (id, review) = load_review(&state, &id).await?;

    if !policy::can_modify_review(&user, &review) {
        return Err(AppError::forbidden(
            "You do not have permission to modify this review",
        ));
    }
    if let Some(rating) = req.rating {
        check_rating(rating)?;
    }

    let updated = ReviewRepository::new(state.get_db()).update(&id, req).await?;
    Ok(ok(updated))
}

/// Delete a review (owner or admin)
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let (id, review) = load_review(&state, &id).await?;

    if !policy::can_modify_review(&user, &review) {
        return Err(AppError::forbidden(
            "You do not have permission to delete this review",
        ));
    }

    ReviewRepository::new(state.get_db()).delete(&id).await?;
    Ok(ok_with_message((), "Review deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RestaurantCreate;
    use shared::Role;

    fn customer(name: &str) -> CurrentUser {
        CurrentUser {
            id: format!("user:{}", name),
            username: name.to_string(),
            role: Role::Customer,
        }
    }

    async fn approved_restaurant(state: &ServerState) -> RecordId {
        let repo = RestaurantRepository::new(state.get_db());
        let created = repo
            .create(
                "user:boss".parse().unwrap(),
                RestaurantCreate {
                    name: "Chez Test".into(),
                    address: "1 Main St".into(),
                    city: "Springfield".into(),
                    state: "IL".into(),
                    zip_code: "62701".into(),
                    cuisine: "french".into(),
                    cost_rating: 3,
                    description: String::new(),
                    capacity: None,
                },
            )
            .await
            .unwrap();
        let id = created.id.unwrap();
        repo.set_approved(&id, true).await.unwrap();
        id
    }

    fn payload(restaurant: &RecordId, rating: i32) -> ReviewCreate {
        ReviewCreate {
            restaurant: restaurant.clone(),
            rating,
            comment: "Lovely evening".into(),
        }
    }

    #[tokio::test]
    async fn one_review_per_customer_and_restaurant() {
        let state = ServerState::for_tests().await;
        let r = approved_restaurant(&state).await;
        let alice = customer("alice");

        create(State(state.clone()), alice.clone(), Json(payload(&r, 5)))
            .await
            .unwrap();

        let err = create(State(state.clone()), alice, Json(payload(&r, 3)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateReview);

        // 其他 customer 不受影响
        create(State(state), customer("bob"), Json(payload(&r, 4)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rating_bounds_enforced() {
        let state = ServerState::for_tests().await;
        let r = approved_restaurant(&state).await;

        for bad in [0, 6] {
            let err = create(
                State(state.clone()),
                customer("alice"),
                Json(payload(&r, bad)),
            )
            .await
            .unwrap_err();
            assert_eq!(err.code(), ErrorCode::RatingOutOfRange, "rating {}", bad);
        }
    }

    #[tokio::test]
    async fn only_owner_or_admin_modifies_review() {
        let state = ServerState::for_tests().await;
        let r = approved_restaurant(&state).await;
        let alice = customer("alice");

        let created = create(State(state.clone()), alice.clone(), Json(payload(&r, 4)))
            .await
            .unwrap()
            .0
            .data
            .unwrap();
        let id = created.id.unwrap().to_string();

        let err = update(
            State(state.clone()),
            customer("mallory"),
            Path(id.clone()),
            Json(ReviewUpdate {
                rating: Some(1),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = update(
            State(state.clone()),
            alice.clone(),
            Path(id.clone()),
            Json(ReviewUpdate {
                rating: Some(5),
                ..Default::default()
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        assert_eq!(updated.rating, 5);

        let admin = CurrentUser {
            id: "user:root".into(),
            username: "root".into(),
            role: Role::Admin,
        };
        remove(State(state), admin, Path(id)).await.unwrap();
    }

    #[tokio::test]
    async fn restaurant_reviews_browsing() {
        let state = ServerState::for_tests().await;
        let r = approved_restaurant(&state).await;

        create(State(state.clone()), customer("alice"), Json(payload(&r, 5)))
            .await
            .unwrap();
        create(State(state.clone()), customer("bob"), Json(payload(&r, 2)))
            .await
            .unwrap();

        // 任何 customer 都能浏览整家餐厅的评价
        let reviews = restaurant_reviews(
            State(state.clone()),
            customer("carol"),
            Query(RestaurantReviewsQuery {
                restaurant_id: Some(r.to_string()),
            }),
        )
        .await
        .unwrap()
        .0
        .data
        .unwrap();
        assert_eq!(reviews.len(), 2);

        // restaurant 参数必填
        let err = restaurant_reviews(
            State(state),
            customer("carol"),
            Query(RestaurantReviewsQuery { restaurant_id: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::RequiredField);
    }
}
