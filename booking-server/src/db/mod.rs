//! Database Module
//!
//! 嵌入式 SurrealDB 连接管理。模型定义见 [`models`]，
//! 数据访问见 [`repository`]。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "tablebook";
const DATABASE: &str = "main";

/// 打开数据目录下的嵌入式数据库
pub async fn connect(data_dir: &str) -> anyhow::Result<Surreal<Db>> {
    let path = format!("{}/db", data_dir);
    let db = Surreal::new::<RocksDb>(path.as_str()).await?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;

    tracing::info!("Database opened at {}", path);
    Ok(db)
}

/// 打开内存数据库 (测试和本地开发)
pub async fn connect_in_memory() -> anyhow::Result<Surreal<Db>> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    Ok(db)
}
