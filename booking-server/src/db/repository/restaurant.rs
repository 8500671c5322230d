//! Restaurant Repository

use super::{BaseRepository, ListScope, RepoError, RepoResult};
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use crate::db::models::restaurant::DEFAULT_CAPACITY;
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "restaurant";

/// 餐厅列表过滤参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantFilter {
    /// 名称子串匹配 (不区分大小写)
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub cuisine: Option<String>,
    pub min_cost_rating: Option<i32>,
    pub max_cost_rating: Option<i32>,
}

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// 按角色范围和过滤参数查询餐厅，按名称排序
    ///
    /// customer 范围只返回已批准的餐厅。
    pub async fn find_scoped(
        &self,
        scope: &ListScope,
        filter: &RestaurantFilter,
    ) -> RepoResult<Vec<Restaurant>> {
        let mut clauses: Vec<&str> = Vec::new();

        match scope {
            ListScope::All => {}
            ListScope::OwnedRestaurants(_) => clauses.push("owner = $scope_user"),
            ListScope::OwnCustomer(_) => clauses.push("is_approved = true"),
        }
        if filter.name.is_some() {
            clauses.push("string::contains(string::lowercase(name), $name)");
        }
        if filter.city.is_some() {
            clauses.push("string::contains(string::lowercase(city), $city)");
        }
        if filter.state.is_some() {
            clauses.push("string::contains(string::lowercase(state), $state)");
        }
        if filter.cuisine.is_some() {
            clauses.push("string::contains(string::lowercase(cuisine), $cuisine)");
        }
        if filter.min_cost_rating.is_some() {
            clauses.push("cost_rating >= $min_cost_rating");
        }
        if filter.max_cost_rating.is_some() {
            clauses.push("cost_rating <= $max_cost_rating");
        }

        let mut sql = format!("SELECT * FROM {}", TABLE);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY name");

        let mut q = self.base.db().query(sql);
        if let ListScope::OwnedRestaurants(user) = scope {
            q = q.bind(("scope_user", user.clone()));
        }
        if let Some(name) = &filter.name {
            q = q.bind(("name", name.to_lowercase()));
        }
        if let Some(city) = &filter.city {
            q = q.bind(("city", city.to_lowercase()));
        }
        if let Some(state) = &filter.state {
            q = q.bind(("state", state.to_lowercase()));
        }
        if let Some(cuisine) = &filter.cuisine {
            q = q.bind(("cuisine", cuisine.to_lowercase()));
        }
        if let Some(n) = filter.min_cost_rating {
            q = q.bind(("min_cost_rating", n));
        }
        if let Some(n) = filter.max_cost_rating {
            q = q.bind(("max_cost_rating", n));
        }

        let restaurants: Vec<Restaurant> = q.await?.take(0)?;
        Ok(restaurants)
    }

    /// 公开搜索：只搜已批准餐厅，按 city/state/zip_code 子串匹配
    pub async fn search_approved(
        &self,
        city: Option<String>,
        state: Option<String>,
        zip_code: Option<String>,
    ) -> RepoResult<Vec<Restaurant>> {
        let mut clauses = vec!["is_approved = true"];
        if city.is_some() {
            clauses.push("string::contains(string::lowercase(city), $city)");
        }
        if state.is_some() {
            clauses.push("string::contains(string::lowercase(state), $state)");
        }
        if zip_code.is_some() {
            clauses.push("string::contains(zip_code, $zip_code)");
        }

        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY name",
            TABLE,
            clauses.join(" AND ")
        );

        let mut q = self.base.db().query(sql);
        if let Some(city) = city {
            q = q.bind(("city", city.to_lowercase()));
        }
        if let Some(state) = state {
            q = q.bind(("state", state.to_lowercase()));
        }
        if let Some(zip) = zip_code {
            q = q.bind(("zip_code", zip));
        }

        let restaurants: Vec<Restaurant> = q.await?.take(0)?;
        Ok(restaurants)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Restaurant>> {
        let restaurant: Option<Restaurant> = self.base.db().select(id.clone()).await?;
        Ok(restaurant)
    }

    /// Create a new restaurant (owner 已由 caller 设置为当前 manager)
    pub async fn create(&self, owner: RecordId, data: RestaurantCreate) -> RepoResult<Restaurant> {
        let restaurant = Restaurant {
            id: None,
            owner,
            name: data.name,
            address: data.address,
            city: data.city,
            state: data.state,
            zip_code: data.zip_code,
            cuisine: data.cuisine,
            cost_rating: data.cost_rating,
            description: data.description,
            capacity: data.capacity.unwrap_or(DEFAULT_CAPACITY),
            is_approved: false,
        };

        let created: Option<Restaurant> = self.base.db().create(TABLE).content(restaurant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// 部分更新：缺省字段保留原值
    pub async fn update(&self, id: &RecordId, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))?;

        let merged = Restaurant {
            id: existing.id,
            owner: existing.owner,
            name: data.name.unwrap_or(existing.name),
            address: data.address.unwrap_or(existing.address),
            city: data.city.unwrap_or(existing.city),
            state: data.state.unwrap_or(existing.state),
            zip_code: data.zip_code.unwrap_or(existing.zip_code),
            cuisine: data.cuisine.unwrap_or(existing.cuisine),
            cost_rating: data.cost_rating.unwrap_or(existing.cost_rating),
            description: data.description.unwrap_or(existing.description),
            capacity: data.capacity.unwrap_or(existing.capacity),
            is_approved: existing.is_approved,
        };

        let updated: Option<Restaurant> =
            self.base.db().update(id.clone()).content(merged).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }

    /// 设置批准状态 (admin 专用)
    pub async fn set_approved(&self, id: &RecordId, approved: bool) -> RepoResult<Restaurant> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET is_approved = $approved RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("approved", approved))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        restaurants
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }

    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Restaurant> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
