//! Review Repository

use super::{BaseRepository, ListScope, RepoError, RepoResult};
use crate::db::models::{Review, ReviewCreate, ReviewUpdate};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "review";

/// 评价列表过滤参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewFilter {
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// true 时只要有文字内容的评价
    pub has_comment: Option<bool>,
}

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// 按角色范围和过滤参数查询评价，按创建时间倒序
    pub async fn find_scoped(
        &self,
        scope: &ListScope,
        filter: &ReviewFilter,
    ) -> RepoResult<Vec<Review>> {
        let mut clauses: Vec<&str> = Vec::new();

        match scope {
            ListScope::All => {}
            ListScope::OwnedRestaurants(_) => clauses.push("restaurant.owner = $scope_user"),
            ListScope::OwnCustomer(_) => clauses.push("customer = $scope_user"),
        }
        if filter.min_rating.is_some() {
            clauses.push("rating >= $min_rating");
        }
        if filter.max_rating.is_some() {
            clauses.push("rating <= $max_rating");
        }
        // created_at 存的是 RFC3339 字符串，前 10 位就是 'YYYY-MM-DD'
        if filter.min_date.is_some() {
            clauses.push("string::slice(created_at, 0, 10) >= $min_date");
        }
        if filter.max_date.is_some() {
            clauses.push("string::slice(created_at, 0, 10) <= $max_date");
        }
        if filter.has_comment == Some(true) {
            clauses.push("string::len(comment) > 0");
        }

        let mut sql = format!("SELECT * FROM {}", TABLE);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut q = self.base.db().query(sql);
        match scope {
            ListScope::OwnedRestaurants(user) | ListScope::OwnCustomer(user) => {
                q = q.bind(("scope_user", user.clone()));
            }
            ListScope::All => {}
        }
        if let Some(n) = filter.min_rating {
            q = q.bind(("min_rating", n));
        }
        if let Some(n) = filter.max_rating {
            q = q.bind(("max_rating", n));
        }
        if let Some(d) = filter.min_date {
            q = q.bind(("min_date", d.to_string()));
        }
        if let Some(d) = filter.max_date {
            q = q.bind(("max_date", d.to_string()));
        }

        let reviews: Vec<Review> = q.await?.take(0)?;
        Ok(reviews)
    }

    /// 某餐厅的评价，带角色范围
    pub async fn find_by_restaurant(
        &self,
        scope: &ListScope,
        restaurant: &RecordId,
    ) -> RepoResult<Vec<Review>> {
        let mut clauses = vec!["restaurant = $restaurant"];
        match scope {
            ListScope::All => {}
            ListScope::OwnedRestaurants(_) => clauses.push("restaurant.owner = $scope_user"),
            ListScope::OwnCustomer(_) => clauses.push("customer = $scope_user"),
        }

        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY created_at DESC",
            TABLE,
            clauses.join(" AND ")
        );

        let mut q = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.clone()));
        match scope {
            ListScope::OwnedRestaurants(user) | ListScope::OwnCustomer(user) => {
                q = q.bind(("scope_user", user.clone()));
            }
            ListScope::All => {}
        }

        let reviews: Vec<Review> = q.await?.take(0)?;
        Ok(reviews)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Review>> {
        let review: Option<Review> = self.base.db().select(id.clone()).await?;
        Ok(review)
    }

    /// 同一 (customer, restaurant) 是否已有评价
    pub async fn exists_for(
        &self,
        customer: &RecordId,
        restaurant: &RecordId,
    ) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT id FROM review WHERE customer = $customer AND restaurant = $restaurant LIMIT 1",
            )
            .bind(("customer", customer.clone()))
            .bind(("restaurant", restaurant.clone()))
            .await?;
        let rows: Vec<serde_json::Value> = result.take(0)?;
        Ok(!rows.is_empty())
    }

    /// Create a new review
    ///
    /// 重复评价在这里拦截 (存储层没有唯一约束)。
    pub async fn create(&self, customer: RecordId, data: ReviewCreate) -> RepoResult<Review> {
        if self.exists_for(&customer, &data.restaurant).await? {
            return Err(RepoError::Duplicate(
                "You have already reviewed this restaurant".to_string(),
            ));
        }

        let review = Review {
            id: None,
            customer,
            restaurant: data.restaurant,
            rating: data.rating,
            comment: data.comment,
            created_at: Utc::now(),
        };

        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// 部分更新：缺省字段保留原值
    pub async fn update(&self, id: &RecordId, data: ReviewUpdate) -> RepoResult<Review> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))?;

        let merged = Review {
            rating: data.rating.unwrap_or(existing.rating),
            comment: data.comment.unwrap_or(existing.comment),
            ..existing
        };

        let updated: Option<Review> = self.base.db().update(id.clone()).content(merged).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Review> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
