//! 时段容量计算
//!
//! 一个时段的已占用人数是该 (餐厅, 日期, 时间) 下所有
//! pending/confirmed 预订的 party_size 之和；cancelled 和
//! completed 不占容量。

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use surrealdb::RecordId;

use crate::db::repository::{BookingRepository, RepoResult};

/// 一次容量检查的结果
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    /// 请求的人数是否放得下
    pub available: bool,
    /// 已占用人数 (pending + confirmed)
    pub booked: i32,
    /// 餐厅时段容量
    pub capacity: i32,
    /// 剩余可订人数
    pub remaining: i32,
}

/// 检查某时段是否还容得下 `party_size` 人
///
/// 更新已有预订时通过 `exclude` 排除其旧占用，否则预订会和
/// 自己的旧值叠加竞争容量。
///
/// 注意：检查本身不加锁。写路径必须先持有对应的
/// [`SlotLocks`](super::SlotLocks) 守卫再调用，否则结果到写入
/// 之间可能被并发请求抢占。
pub async fn check_availability(
    repo: &BookingRepository,
    restaurant: &RecordId,
    capacity: i32,
    date: NaiveDate,
    time: NaiveTime,
    party_size: i32,
    exclude: Option<&RecordId>,
) -> RepoResult<Availability> {
    let booked = repo.sum_party_size(restaurant, date, time, exclude).await?;
    let remaining = (capacity - booked).max(0);

    Ok(Availability {
        available: booked + party_size <= capacity,
        booked,
        capacity,
        remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::models::{Booking, BookingStatus};
    use chrono::Utc;

    const CAPACITY: i32 = 100;

    fn slot() -> (RecordId, NaiveDate, NaiveTime) {
        (
            "restaurant:r1".parse().unwrap(),
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        )
    }

    fn booking(
        restaurant: &RecordId,
        date: NaiveDate,
        time: NaiveTime,
        party_size: i32,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id: None,
            customer: "user:c1".parse().unwrap(),
            restaurant: restaurant.clone(),
            date,
            time,
            party_size,
            status,
            email: None,
            phone_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn repo() -> BookingRepository {
        BookingRepository::new(db::connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn empty_slot_accepts_full_capacity_but_not_more() {
        let repo = repo().await;
        let (r, d, t) = slot();

        let full = check_availability(&repo, &r, CAPACITY, d, t, 100, None)
            .await
            .unwrap();
        assert!(full.available);
        assert_eq!(full.booked, 0);
        assert_eq!(full.remaining, 100);

        let over = check_availability(&repo, &r, CAPACITY, d, t, 101, None)
            .await
            .unwrap();
        assert!(!over.available);
    }

    #[tokio::test]
    async fn boundary_at_capacity() {
        let repo = repo().await;
        let (r, d, t) = slot();
        repo.create(booking(&r, d, t, 97, BookingStatus::Pending))
            .await
            .unwrap();

        let fits = check_availability(&repo, &r, CAPACITY, d, t, 3, None)
            .await
            .unwrap();
        assert!(fits.available);
        assert_eq!(fits.booked, 97);
        assert_eq!(fits.remaining, 3);

        let over = check_availability(&repo, &r, CAPACITY, d, t, 4, None)
            .await
            .unwrap();
        assert!(!over.available);
    }

    #[tokio::test]
    async fn cancelled_and_completed_do_not_hold_capacity() {
        let repo = repo().await;
        let (r, d, t) = slot();
        repo.create(booking(&r, d, t, 60, BookingStatus::Cancelled))
            .await
            .unwrap();
        repo.create(booking(&r, d, t, 60, BookingStatus::Completed))
            .await
            .unwrap();
        repo.create(booking(&r, d, t, 10, BookingStatus::Confirmed))
            .await
            .unwrap();

        let result = check_availability(&repo, &r, CAPACITY, d, t, 90, None)
            .await
            .unwrap();
        assert!(result.available);
        assert_eq!(result.booked, 10);
    }

    #[tokio::test]
    async fn other_slots_do_not_count() {
        let repo = repo().await;
        let (r, d, t) = slot();
        let other_restaurant: RecordId = "restaurant:r2".parse().unwrap();
        let other_time = NaiveTime::from_hms_opt(20, 0, 0).unwrap();

        repo.create(booking(&other_restaurant, d, t, 100, BookingStatus::Pending))
            .await
            .unwrap();
        repo.create(booking(&r, d, other_time, 100, BookingStatus::Pending))
            .await
            .unwrap();

        let result = check_availability(&repo, &r, CAPACITY, d, t, 100, None)
            .await
            .unwrap();
        assert!(result.available);
        assert_eq!(result.booked, 0);
    }

    #[tokio::test]
    async fn update_excludes_own_old_booking() {
        let repo = repo().await;
        let (r, d, t) = slot();
        let mine = repo
            .create(booking(&r, d, t, 96, BookingStatus::Confirmed))
            .await
            .unwrap();
        let mine_id = mine.id.unwrap();

        // 未排除自身：96 已占用，再放 5 人超出
        let naive = check_availability(&repo, &r, CAPACITY, d, t, 5, None)
            .await
            .unwrap();
        assert!(!naive.available);

        // 排除自身旧占用后，5 人相当于从 96 改到 5，放得下
        let excluded = check_availability(&repo, &r, CAPACITY, d, t, 5, Some(&mine_id))
            .await
            .unwrap();
        assert!(excluded.available);
        assert_eq!(excluded.booked, 0);
    }

    #[tokio::test]
    async fn small_restaurant_uses_own_capacity() {
        let repo = repo().await;
        let (r, d, t) = slot();
        repo.create(booking(&r, d, t, 8, BookingStatus::Pending))
            .await
            .unwrap();

        let result = check_availability(&repo, &r, 10, d, t, 3, None)
            .await
            .unwrap();
        assert!(!result.available);
        assert_eq!(result.remaining, 2);
    }
}
