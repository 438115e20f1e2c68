use std::sync::Arc;

use dashmap::DashMap;
use shared::message::WaitlistEvent;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::broadcast::WaitlistBroadcaster;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是核心数据结构，使用 Arc 实现浅拷贝。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | SqlitePool | SQLite 连接池 |
/// | broadcaster | Arc<WaitlistBroadcaster> | 每餐厅事件广播 |
/// | create_locks | DashMap | 每餐厅 create 串行化锁 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub db: SqlitePool,
    /// 通知广播器
    pub broadcaster: Arc<WaitlistBroadcaster>,
    /// 每餐厅 create 锁 — 让重复守卫检查 + 插入对并发 join 原子
    create_locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/qwait.db)
    /// 3. 广播器
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_service = DbService::new(&config.database_file()).await?;

        Ok(Self::with_pool(config.clone(), db_service.pool))
    }

    /// 从现有连接池构造 (测试用 in-memory 池)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let capacity = config.event_channel_capacity;
        Self {
            config,
            db: pool,
            broadcaster: Arc::new(WaitlistBroadcaster::new(capacity)),
            create_locks: Arc::new(DashMap::new()),
        }
    }

    /// 获取一家餐厅的 create 锁
    pub fn create_lock(&self, restaurant_id: i64) -> Arc<Mutex<()>> {
        self.create_locks
            .entry(restaurant_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 广播变更事件
    ///
    /// 必须在存储操作提交之后调用，绝不提前 —— 不广播可能回滚的状态。
    /// 投递失败不影响调用方。
    pub fn broadcast(&self, restaurant_id: i64, event: WaitlistEvent) {
        let receivers = self.broadcaster.publish(restaurant_id, event.clone());
        tracing::debug!(
            restaurant_id,
            event = event.kind(),
            entry_id = event.entry_id(),
            receivers,
            "Broadcast waitlist event"
        );
    }
}
