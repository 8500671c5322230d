//! 访问策略
//!
//! 所有预订/餐厅/评价操作的授权判定集中在这里，
//! 每个操作一个显式判定函数，方便整体审计。
//!
//! # 策略表
//!
//! | 操作 | customer | manager | admin |
//! |------|----------|---------|-------|
//! | booking 列表范围 | 自己的预订 | 名下餐厅的预订 | 全部 |
//! | booking 读取/更新/删除/取消 | 仅自己的 | 任意 | 任意 |
//! | booking confirm/complete | 否 | 仅名下餐厅 | 任意 |
//! | restaurant 创建 | 否 | 是 | 否 |
//! | restaurant 更新/删除 | 否 | 仅自己的 | 任意 |
//! | restaurant 批准 | 否 | 否 | 是 |
//! | review 更新/删除 | 仅自己的 | 否 | 任意 |

use shared::Role;
use surrealdb::RecordId;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::db::models::{Booking, Review};
use crate::db::repository::ListScope;
use crate::utils::AppResult;

/// 实体引用是否属于当前用户
fn owns(user: &CurrentUser, id: &RecordId) -> bool {
    id.to_string() == user.id
}

/// 角色对应的列表可见范围 (booking/restaurant/review 共用)
///
/// customer 的范围在餐厅仓库里解释为"仅已批准"。
pub fn list_scope(user: &CurrentUser) -> AppResult<ListScope> {
    let id = user
        .record_id()
        .map_err(AppError::invalid_token)?;
    Ok(match user.role {
        Role::Admin => ListScope::All,
        Role::Manager => ListScope::OwnedRestaurants(id),
        Role::Customer => ListScope::OwnCustomer(id),
    })
}

/// 预订读取：本人、名下餐厅的 manager、admin
pub fn can_view_booking(
    user: &CurrentUser,
    booking: &Booking,
    restaurant_owner: &RecordId,
) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Manager => owns(user, restaurant_owner),
        Role::Customer => owns(user, &booking.customer),
    }
}

/// 预订更新/删除/取消：本人或任意 manager/admin
pub fn can_modify_booking(user: &CurrentUser, booking: &Booking) -> bool {
    user.is_staff() || owns(user, &booking.customer)
}

/// 预订状态流转 (confirm/complete)：admin 或名下餐厅的 manager
pub fn can_transition_booking(user: &CurrentUser, restaurant_owner: &RecordId) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Manager => owns(user, restaurant_owner),
        Role::Customer => false,
    }
}

/// 餐厅创建：仅 manager 角色
pub fn can_create_restaurant(user: &CurrentUser) -> bool {
    user.role == Role::Manager
}

/// 餐厅更新/删除：所有者或 admin
pub fn can_modify_restaurant(user: &CurrentUser, owner: &RecordId) -> bool {
    user.is_admin() || owns(user, owner)
}

/// 餐厅批准：仅 admin
pub fn can_approve_restaurant(user: &CurrentUser) -> bool {
    user.is_admin()
}

/// 评价更新/删除：本人或 admin
pub fn can_modify_review(user: &CurrentUser, review: &Review) -> bool {
    user.is_admin() || owns(user, &review.customer)
}
