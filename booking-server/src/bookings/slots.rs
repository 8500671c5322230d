//! 时段锁表
//!
//! 预订的 "检查容量 → 写入" 不是单条原子操作，两个并发请求
//! 可能同时读到同一份剩余容量然后双双写入，造成超订。
//! 解决办法：每个 (餐厅, 日期, 时间) 时段一把异步互斥锁，
//! 检查和写入全程持锁。

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use dashmap::DashMap;
use surrealdb::RecordId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 按时段粒度的锁表
///
/// 锁条目按需创建，不同时段互不阻塞。
#[derive(Debug, Default)]
pub struct SlotLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    fn key(restaurant: &RecordId, date: NaiveDate, time: NaiveTime) -> String {
        format!("{}|{}|{}", restaurant, date, time.format("%H:%M:%S"))
    }

    /// 获取指定时段的锁，守卫释放前该时段的其他请求全部等待
    pub async fn acquire(
        &self,
        restaurant: &RecordId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(Self::key(restaurant, date, time))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn slot() -> (RecordId, NaiveDate, NaiveTime) {
        (
            "restaurant:r1".parse().unwrap(),
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn same_slot_is_exclusive() {
        let locks = SlotLocks::new();
        let (r, d, t) = slot();

        let guard = locks.acquire(&r, d, t).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&r, d, t)).await;
        assert!(second.is_err(), "second acquire should block while held");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&r, d, t)).await;
        assert!(third.is_ok(), "lock should be free after release");
    }

    #[tokio::test]
    async fn different_slots_do_not_block() {
        let locks = SlotLocks::new();
        let (r, d, t) = slot();
        let other_time = NaiveTime::from_hms_opt(20, 0, 0).unwrap();

        let _guard = locks.acquire(&r, d, t).await;
        let other =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire(&r, d, other_time)).await;
        assert!(other.is_ok());
    }
}
