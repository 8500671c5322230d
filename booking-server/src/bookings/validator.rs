//! 预订参数校验
//!
//! 规则按固定顺序执行，返回第一个失败项：
//!
//! 1. 日期不能早于今天
//! 2. 人数在 1-20 之间
//! 3. 时段剩余容量足够

use chrono::{NaiveDate, NaiveTime};
use shared::ErrorCode;
use surrealdb::RecordId;

use crate::AppError;
use crate::bookings::availability::check_availability;
use crate::db::repository::BookingRepository;
use crate::utils::AppResult;
use crate::utils::time::is_past_date;

pub const MIN_PARTY_SIZE: i32 = 1;
pub const MAX_PARTY_SIZE: i32 = 20;

/// 校验一次预订写入 (创建或更新后的最终值)
///
/// 更新场景传入 `exclude` 排除预订自身的旧占用。
/// 调用方必须先持有对应时段的锁。
pub async fn validate_booking(
    repo: &BookingRepository,
    restaurant: &RecordId,
    capacity: i32,
    date: NaiveDate,
    time: NaiveTime,
    party_size: i32,
    exclude: Option<&RecordId>,
) -> AppResult<()> {
    if is_past_date(date) {
        return Err(AppError::field("date", ErrorCode::PastDate));
    }

    if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&party_size) {
        return Err(AppError::field("party_size", ErrorCode::PartySizeOutOfRange));
    }

    let availability =
        check_availability(repo, restaurant, capacity, date, time, party_size, exclude).await?;
    if !availability.available {
        return Err(AppError::field("time", ErrorCode::SlotUnavailable));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::models::{Booking, BookingStatus};
    use crate::utils::time::today_local;
    use chrono::{Duration, Utc};

    const CAPACITY: i32 = 100;

    async fn repo() -> BookingRepository {
        BookingRepository::new(db::connect_in_memory().await.unwrap())
    }

    fn restaurant() -> RecordId {
        "restaurant:r1".parse().unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(19, 0, 0).unwrap()
    }

    fn code_of(err: AppError) -> ErrorCode {
        err.code()
    }

    #[tokio::test]
    async fn past_date_rejected() {
        let repo = repo().await;
        let yesterday = today_local() - Duration::days(1);

        let err = validate_booking(&repo, &restaurant(), CAPACITY, yesterday, time(), 4, None)
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::PastDate);
    }

    #[tokio::test]
    async fn party_size_bounds() {
        let repo = repo().await;
        let tomorrow = today_local() + Duration::days(1);

        for bad in [0, -1, 21] {
            let err = validate_booking(&repo, &restaurant(), CAPACITY, tomorrow, time(), bad, None)
                .await
                .unwrap_err();
            assert_eq!(code_of(err), ErrorCode::PartySizeOutOfRange, "size {}", bad);
        }

        for good in [1, 20] {
            validate_booking(&repo, &restaurant(), CAPACITY, tomorrow, time(), good, None)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn date_rule_wins_over_party_size_rule() {
        let repo = repo().await;
        let yesterday = today_local() - Duration::days(1);

        // 两条规则同时违反时报日期错误
        let err = validate_booking(&repo, &restaurant(), CAPACITY, yesterday, time(), 0, None)
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::PastDate);
    }

    #[tokio::test]
    async fn full_slot_rejected() {
        let repo = repo().await;
        let tomorrow = today_local() + Duration::days(1);
        let r = restaurant();

        repo.create(Booking {
            id: None,
            customer: "user:c1".parse().unwrap(),
            restaurant: r.clone(),
            date: tomorrow,
            time: time(),
            party_size: 96,
            status: BookingStatus::Confirmed,
            email: None,
            phone_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap();

        let err = validate_booking(&repo, &r, CAPACITY, tomorrow, time(), 5, None)
            .await
            .unwrap_err();
        assert_eq!(code_of(err), ErrorCode::SlotUnavailable);

        validate_booking(&repo, &r, CAPACITY, tomorrow, time(), 4, None)
            .await
            .unwrap();
    }
}
