//! Booking Routes
//!
//! 预订的 CRUD、状态流转和可用性查询。
//!
//! 所有会占用容量的写入 (创建/更新/改期) 都先持有对应时段的
//! [`SlotLocks`](crate::bookings::SlotLocks) 守卫，再做容量检查和写入。

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use shared::{ApiResponse, ErrorCode};
use surrealdb::RecordId;

use super::parse_id;
use crate::AppError;
use crate::auth::{CurrentUser, policy};
use crate::bookings::{Availability, check_availability, validate_booking};
use crate::core::ServerState;
use crate::db::models::serde_helpers;
use crate::db::models::{Booking, BookingCreate, BookingStatus, BookingUpdate, Restaurant};
use crate::db::repository::{
    BookingFilter, BookingRepository, RestaurantRepository, UserRepository,
};
use crate::utils::time::is_past_date;
use crate::utils::{AppResult, ok, ok_with_message};

/// Build booking router (全部需要认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/bookings", get(list).post(create))
        .route("/api/bookings/availability", get(availability))
        .route(
            "/api/bookings/{id}",
            get(get_one).put(update).delete(remove),
        )
        .route("/api/bookings/{id}/confirm", post(confirm))
        .route("/api/bookings/{id}/cancel", post(cancel))
        .route("/api/bookings/{id}/complete", post(complete))
        .route("/api/bookings/{id}/reschedule", post(reschedule))
}

/// 加载预订和它引用的餐厅
async fn load_booking(
    state: &ServerState,
    raw_id: &str,
) -> AppResult<(RecordId, Booking, Restaurant)> {
    let id = parse_id("booking", raw_id)?;
    let booking = BookingRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(AppError::booking_not_found)?;
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&booking.restaurant)
        .await?
        .ok_or_else(AppError::restaurant_not_found)?;
    Ok((id, booking, restaurant))
}

/// List bookings (角色范围 + 过滤参数)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(filter): Query<BookingFilter>,
) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    let scope = policy::list_scope(&user)?;
    let bookings = BookingRepository::new(state.get_db())
        .find_scoped(&scope, &filter)
        .await?;
    Ok(ok(bookings))
}

/// Get a single booking
pub async fn get_one(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let (_, booking, restaurant) = load_booking(&state, &id).await?;

    if !policy::can_view_booking(&user, &booking, &restaurant.owner) {
        return Err(AppError::forbidden(
            "You do not have permission to view this booking",
        ));
    }

    Ok(ok(booking))
}

/// Create a booking
///
/// customer 强制为当前用户；联系方式缺省回落到账号资料。
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<BookingCreate>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let bookings = BookingRepository::new(state.get_db());
    let restaurants = RestaurantRepository::new(state.get_db());
    let users = UserRepository::new(state.get_db());

    let restaurant = restaurants
        .find_by_id(&req.restaurant)
        .await?
        .ok_or_else(AppError::restaurant_not_found)?;
    // 未批准的餐厅对 customer 视同不存在
    if !restaurant.is_approved && !user.is_staff() {
        return Err(AppError::restaurant_not_found());
    }

    let customer_id = user.record_id().map_err(AppError::invalid_token)?;
    let account = users.find_by_id(&customer_id).await?;
    let email = req
        .email
        .or_else(|| account.as_ref().map(|u| u.email.clone()));
    let phone_number = req
        .phone_number
        .or_else(|| account.and_then(|u| u.phone_number));

    // 持锁做 检查+写入，同一时段的并发创建在此排队
    let _guard = state
        .slot_locks
        .acquire(&req.restaurant, req.date, req.time)
        .await;

    validate_booking(
        &bookings,
        &req.restaurant,
        restaurant.capacity,
        req.date,
        req.time,
        req.party_size,
        None,
    )
    .await?;

    let now = Utc::now();
    let created = bookings
        .create(Booking {
            id: None,
            customer: customer_id,
            restaurant: req.restaurant,
            date: req.date,
            time: req.time,
            party_size: req.party_size,
            status: BookingStatus::Pending,
            email,
            phone_number,
            created_at: now,
            updated_at: now,
        })
        .await?;

    state.notifier.booking_created(&created, &restaurant.name);

    Ok(ok_with_message(created, "Booking created"))
}

/// Update a booking (partial)
///
/// 改动时段相关字段时重新做容量校验，排除本预订的旧占用。
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<BookingUpdate>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let (id, existing, _) = load_booking(&state, &id).await?;

    if !policy::can_modify_booking(&user, &existing) {
        return Err(AppError::forbidden(
            "You do not have permission to modify this booking",
        ));
    }

    let bookings = BookingRepository::new(state.get_db());
    let restaurants = RestaurantRepository::new(state.get_db());

    let restaurant_id = req
        .restaurant
        .clone()
        .unwrap_or_else(|| existing.restaurant.clone());
    let restaurant = restaurants
        .find_by_id(&restaurant_id)
        .await?
        .ok_or_else(AppError::restaurant_not_found)?;

    let date = req.date.unwrap_or(existing.date);
    let time = req.time.unwrap_or(existing.time);
    let party_size = req.party_size.unwrap_or(existing.party_size);

    let _guard = if req.touches_slot() {
        let guard = state.slot_locks.acquire(&restaurant_id, date, time).await;
        validate_booking(
            &bookings,
            &restaurant_id,
            restaurant.capacity,
            date,
            time,
            party_size,
            Some(&id),
        )
        .await?;
        Some(guard)
    } else {
        None
    };

    let merged = Booking {
        id: existing.id.clone(),
        customer: existing.customer.clone(),
        restaurant: restaurant_id,
        date,
        time,
        party_size,
        status: existing.status,
        email: req.email.or_else(|| existing.email.clone()),
        phone_number: req.phone_number.or_else(|| existing.phone_number.clone()),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };

    let updated = bookings.update(&id, merged).await?;
    Ok(ok(updated))
}

/// Delete a booking
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let (id, booking, _) = load_booking(&state, &id).await?;

    if !policy::can_modify_booking(&user, &booking) {
        return Err(AppError::forbidden(
            "You do not have permission to delete this booking",
        ));
    }

    BookingRepository::new(state.get_db()).delete(&id).await?;
    Ok(ok_with_message((), "Booking deleted"))
}

/// 状态流转的公共路径
///
/// 状态机：pending→confirmed, pending/confirmed→cancelled,
/// confirmed→completed。
async fn transition(
    state: ServerState,
    user: CurrentUser,
    raw_id: String,
    target: BookingStatus,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let (id, booking, restaurant) = load_booking(&state, &raw_id).await?;

    let permitted = match target {
        BookingStatus::Cancelled => policy::can_modify_booking(&user, &booking),
        _ => policy::can_transition_booking(&user, &restaurant.owner),
    };
    if !permitted {
        return Err(AppError::forbidden(
            "You do not have permission to change this booking's status",
        ));
    }

    let allowed = matches!(
        (booking.status, target),
        (BookingStatus::Pending, BookingStatus::Confirmed)
            | (BookingStatus::Pending, BookingStatus::Cancelled)
            | (BookingStatus::Confirmed, BookingStatus::Cancelled)
            | (BookingStatus::Confirmed, BookingStatus::Completed)
    );
    if !allowed {
        return Err(AppError::validation(format!(
            "Cannot mark a {} booking as {}",
            booking.status, target
        )));
    }

    let updated = BookingRepository::new(state.get_db())
        .set_status(&id, target)
        .await?;

    state
        .notifier
        .booking_status_changed(&updated, &restaurant.name);

    Ok(ok(updated))
}

/// Confirm a pending booking (manager/admin)
pub async fn confirm(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    transition(state, user, id, BookingStatus::Confirmed).await
}

/// Cancel a booking (owner customer or staff)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    transition(state, user, id, BookingStatus::Cancelled).await
}

/// Complete a confirmed booking (manager/admin)
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    transition(state, user, id, BookingStatus::Completed).await
}

/// Reschedule request payload
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub date: NaiveDate,
    #[serde(with = "serde_helpers::flexible_time")]
    pub time: NaiveTime,
}

/// Reschedule a booking to a new date/time
///
/// 改期后回到 pending，等餐厅重新确认。
pub async fn reschedule(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RescheduleRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let (id, booking, restaurant) = load_booking(&state, &id).await?;

    if !policy::can_modify_booking(&user, &booking) {
        return Err(AppError::forbidden(
            "You do not have permission to modify this booking",
        ));
    }
    if !booking.status.holds_capacity() {
        return Err(AppError::validation(format!(
            "Cannot reschedule a {} booking",
            booking.status
        )));
    }

    let bookings = BookingRepository::new(state.get_db());

    let _guard = state
        .slot_locks
        .acquire(&booking.restaurant, req.date, req.time)
        .await;

    validate_booking(
        &bookings,
        &booking.restaurant,
        restaurant.capacity,
        req.date,
        req.time,
        booking.party_size,
        Some(&id),
    )
    .await?;

    let rescheduled = Booking {
        date: req.date,
        time: req.time,
        status: BookingStatus::Pending,
        ..booking
    };
    let updated = bookings.update(&id, rescheduled).await?;

    state
        .notifier
        .booking_status_changed(&updated, &restaurant.name);

    Ok(ok(updated))
}

/// Availability query parameters (全部必填，缺失逐字段报错)
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub restaurant: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub party_size: Option<i32>,
}

/// Check slot availability without creating a booking
pub async fn availability(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(q): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<Availability>>> {
    let raw_restaurant = q
        .restaurant
        .ok_or_else(|| AppError::field("restaurant", ErrorCode::RequiredField))?;
    let date = q
        .date
        .ok_or_else(|| AppError::field("date", ErrorCode::RequiredField))?;
    let raw_time = q
        .time
        .ok_or_else(|| AppError::field("time", ErrorCode::RequiredField))?;
    let party_size = q
        .party_size
        .ok_or_else(|| AppError::field("party_size", ErrorCode::RequiredField))?;

    let time = serde_helpers::parse_time(&raw_time).map_err(AppError::validation)?;
    if is_past_date(date) {
        return Err(AppError::field("date", ErrorCode::PastDate));
    }
    if !(crate::bookings::MIN_PARTY_SIZE..=crate::bookings::MAX_PARTY_SIZE).contains(&party_size) {
        return Err(AppError::field("party_size", ErrorCode::PartySizeOutOfRange));
    }

    let restaurant_id = parse_id("restaurant", &raw_restaurant)?;
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&restaurant_id)
        .await?
        .ok_or_else(AppError::restaurant_not_found)?;

    let result = check_availability(
        &BookingRepository::new(state.get_db()),
        &restaurant_id,
        restaurant.capacity,
        date,
        time,
        party_size,
        None,
    )
    .await?;

    Ok(ok(result))
}
