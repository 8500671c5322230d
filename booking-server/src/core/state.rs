use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::bookings::SlotLocks;
use crate::core::Config;
use crate::db;
use crate::notify::Notifier;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | slot_locks | Arc<SlotLocks> | 按时段串行化预订写入 |
/// | notifier | Arc<Notifier> | 通知分发 (尽力而为) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 预订时段锁表
    pub slot_locks: Arc<SlotLocks>,
    /// 通知分发服务
    pub notifier: Arc<Notifier>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 打开数据库并构建各服务实例
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db = db::connect(&config.data_dir).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let slot_locks = Arc::new(SlotLocks::new());
        let notifier = Arc::new(Notifier::new(config.notify.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            slot_locks,
            notifier,
        })
    }

    /// 使用内存数据库构建状态 (测试用)
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let db = db::connect_in_memory().await.unwrap();
        let config = Config::with_overrides("/tmp/tablebook-test", 0);

        Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            slot_locks: Arc::new(SlotLocks::new()),
            notifier: Arc::new(Notifier::new(config.notify.clone())),
        }
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
