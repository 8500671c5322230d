//! Booking Repository

use super::{BaseRepository, ListScope, RepoError, RepoResult};
use crate::db::models::{Booking, BookingStatus};
use crate::utils::time::today_local;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "booking";

/// 预订列表过滤参数
///
/// 与查询字符串一一对应；全部可选，拼成参数化 WHERE 子句。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    /// 餐厅名子串匹配 (不区分大小写)
    pub restaurant_name: Option<String>,
    /// 客户用户名子串匹配 (不区分大小写)
    pub customer_name: Option<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub min_party_size: Option<i32>,
    pub max_party_size: Option<i32>,
    pub status: Option<BookingStatus>,
    /// true 时只看今天及以后的预订
    pub upcoming: Option<bool>,
}

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// 按角色范围和过滤参数查询预订，按日期时间倒序
    pub async fn find_scoped(
        &self,
        scope: &ListScope,
        filter: &BookingFilter,
    ) -> RepoResult<Vec<Booking>> {
        let mut clauses: Vec<&str> = Vec::new();

        match scope {
            ListScope::All => {}
            ListScope::OwnedRestaurants(_) => clauses.push("restaurant.owner = $scope_user"),
            ListScope::OwnCustomer(_) => clauses.push("customer = $scope_user"),
        }
        if filter.restaurant_name.is_some() {
            clauses
                .push("string::contains(string::lowercase(restaurant.name), $restaurant_name)");
        }
        if filter.customer_name.is_some() {
            clauses.push("string::contains(string::lowercase(customer.username), $customer_name)");
        }
        if filter.min_date.is_some() {
            clauses.push("date >= $min_date");
        }
        if filter.max_date.is_some() {
            clauses.push("date <= $max_date");
        }
        if filter.min_party_size.is_some() {
            clauses.push("party_size >= $min_party_size");
        }
        if filter.max_party_size.is_some() {
            clauses.push("party_size <= $max_party_size");
        }
        if filter.status.is_some() {
            clauses.push("status = $status");
        }
        if filter.upcoming == Some(true) {
            clauses.push("date >= $today");
        }

        let mut sql = format!("SELECT * FROM {}", TABLE);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date DESC, time DESC");

        let mut q = self.base.db().query(sql);
        match scope {
            ListScope::OwnedRestaurants(user) | ListScope::OwnCustomer(user) => {
                q = q.bind(("scope_user", user.clone()));
            }
            ListScope::All => {}
        }
        if let Some(name) = &filter.restaurant_name {
            q = q.bind(("restaurant_name", name.to_lowercase()));
        }
        if let Some(name) = &filter.customer_name {
            q = q.bind(("customer_name", name.to_lowercase()));
        }
        if let Some(d) = filter.min_date {
            q = q.bind(("min_date", d));
        }
        if let Some(d) = filter.max_date {
            q = q.bind(("max_date", d));
        }
        if let Some(n) = filter.min_party_size {
            q = q.bind(("min_party_size", n));
        }
        if let Some(n) = filter.max_party_size {
            q = q.bind(("max_party_size", n));
        }
        if let Some(s) = filter.status {
            q = q.bind(("status", s));
        }
        if filter.upcoming == Some(true) {
            q = q.bind(("today", today_local()));
        }

        let bookings: Vec<Booking> = q.await?.take(0)?;
        Ok(bookings)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Booking>> {
        let booking: Option<Booking> = self.base.db().select(id.clone()).await?;
        Ok(booking)
    }

    /// 统计同一 (restaurant, date, time) 时段已占用的人数
    ///
    /// 只统计 pending/confirmed；更新已有预订时通过 `exclude`
    /// 排除其自身的旧占用。
    pub async fn sum_party_size(
        &self,
        restaurant: &RecordId,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<&RecordId>,
    ) -> RepoResult<i32> {
        #[derive(Deserialize)]
        struct SumRow {
            total: Option<i64>,
        }

        let mut sql = String::from(
            "SELECT math::sum(party_size) AS total FROM booking \
             WHERE restaurant = $restaurant AND date = $date AND time = $time \
             AND status IN ['pending', 'confirmed']",
        );
        if exclude.is_some() {
            sql.push_str(" AND id != $exclude");
        }
        sql.push_str(" GROUP ALL");

        let mut q = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.clone()))
            .bind(("date", date))
            .bind(("time", time));
        if let Some(id) = exclude {
            q = q.bind(("exclude", id.clone()));
        }

        let rows: Vec<SumRow> = q.await?.take(0)?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|r| r.total)
            .unwrap_or(0) as i32)
    }

    /// Create a new booking (caller 已完成校验)
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// 整体替换预订内容 (caller 已合并部分更新)
    pub async fn update(&self, id: &RecordId, mut booking: Booking) -> RepoResult<Booking> {
        booking.updated_at = Utc::now();
        let updated: Option<Booking> = self
            .base
            .db()
            .update(id.clone())
            .content(booking)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// 设置预订状态 (confirm/cancel/complete)
    pub async fn set_status(&self, id: &RecordId, status: BookingStatus) -> RepoResult<Booking> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status, updated_at = $updated_at RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("status", status))
            .bind(("updated_at", Utc::now()))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        bookings
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Booking> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::db::models::{RestaurantCreate, User, UserCreate};
    use crate::db::repository::{RestaurantRepository, UserRepository};
    use chrono::Duration;

    fn booking(
        customer: RecordId,
        restaurant: RecordId,
        date: NaiveDate,
        party_size: i32,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id: None,
            customer,
            restaurant,
            date,
            time: "19:00:00".parse().unwrap(),
            party_size,
            status,
            email: None,
            phone_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user_ref(name: &str) -> RecordId {
        format!("user:{}", name).parse().unwrap()
    }

    async fn seed_restaurant(db: &Surreal<Db>, owner: &str, name: &str) -> RecordId {
        RestaurantRepository::new(db.clone())
            .create(
                user_ref(owner),
                RestaurantCreate {
                    name: name.into(),
                    address: "1 Main St".into(),
                    city: "Berkeley".into(),
                    state: "CA".into(),
                    zip_code: "94704".into(),
                    cuisine: "french".into(),
                    cost_rating: 4,
                    description: String::new(),
                    capacity: None,
                },
            )
            .await
            .unwrap()
            .id
            .unwrap()
    }

    #[tokio::test]
    async fn date_party_and_status_filters() {
        let db = connect_in_memory().await.unwrap();
        let repo = BookingRepository::new(db);
        let today = today_local();
        let r: RecordId = "restaurant:grid".parse().unwrap();

        repo.create(booking(
            user_ref("alice"),
            r.clone(),
            today + Duration::days(1),
            2,
            BookingStatus::Pending,
        ))
        .await
        .unwrap();
        repo.create(booking(
            user_ref("bob"),
            r.clone(),
            today + Duration::days(10),
            6,
            BookingStatus::Confirmed,
        ))
        .await
        .unwrap();
        repo.create(booking(
            user_ref("carol"),
            r,
            today - Duration::days(1),
            4,
            BookingStatus::Cancelled,
        ))
        .await
        .unwrap();

        let late = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    min_date: Some(today + Duration::days(5)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].party_size, 6);

        let past = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    max_date: Some(today),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].status, BookingStatus::Cancelled);

        let big = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    min_party_size: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(big.len(), 1);

        let small = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    max_party_size: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(small.len(), 1);
        assert_eq!(small[0].party_size, 2);

        let confirmed = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    status: Some(BookingStatus::Confirmed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);

        // upcoming 只保留今天及以后的预订
        let upcoming = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    upcoming: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(upcoming.len(), 2);
        assert!(upcoming.iter().all(|b| b.date >= today));
    }

    #[tokio::test]
    async fn name_filters_follow_links() {
        let db = connect_in_memory().await.unwrap();
        let repo = BookingRepository::new(db.clone());
        let r = seed_restaurant(&db, "boss", "Chez Panisse").await;

        let alice = UserRepository::new(db.clone())
            .create(
                UserCreate {
                    username: "alice_w".into(),
                    email: "alice@example.com".into(),
                    password: "hunter2hunter2".into(),
                    role: None,
                    phone_number: None,
                },
                User::hash_password("hunter2hunter2").unwrap(),
            )
            .await
            .unwrap();

        repo.create(booking(
            alice.id.unwrap(),
            r,
            today_local() + Duration::days(1),
            2,
            BookingStatus::Pending,
        ))
        .await
        .unwrap();

        let by_restaurant = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    restaurant_name: Some("PANISSE".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_restaurant.len(), 1);

        let by_customer = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    customer_name: Some("lice".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_customer.len(), 1);

        let miss = repo
            .find_scoped(
                &ListScope::All,
                &BookingFilter {
                    restaurant_name: Some("nowhere".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn scopes_limit_visibility() {
        let db = connect_in_memory().await.unwrap();
        let repo = BookingRepository::new(db.clone());
        let r1 = seed_restaurant(&db, "boss1", "Chez Panisse").await;
        let r2 = seed_restaurant(&db, "boss2", "Nopa").await;
        let tomorrow = today_local() + Duration::days(1);

        repo.create(booking(
            user_ref("alice"),
            r1.clone(),
            tomorrow,
            2,
            BookingStatus::Pending,
        ))
        .await
        .unwrap();
        repo.create(booking(
            user_ref("bob"),
            r2,
            tomorrow,
            3,
            BookingStatus::Pending,
        ))
        .await
        .unwrap();

        let all = repo
            .find_scoped(&ListScope::All, &BookingFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let own = repo
            .find_scoped(
                &ListScope::OwnCustomer(user_ref("alice")),
                &BookingFilter::default(),
            )
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].customer, user_ref("alice"));

        let managed = repo
            .find_scoped(
                &ListScope::OwnedRestaurants(user_ref("boss1")),
                &BookingFilter::default(),
            )
            .await
            .unwrap();
        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].restaurant, r1);
    }
}
