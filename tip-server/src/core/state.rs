use std::sync::Arc;
use std::time::Instant;

use crate::core::{Config, Result, ServerError};
use crate::db::{RecordStore, TipStorage};
use crate::services::{LedgerQueries, RosterService};
use crate::settlement::Coordinator;

/// 服务器状态 - 持有所有服务的引用
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 记录存储 (redb)
    pub store: Arc<dyn RecordStore>,
    /// 日报 / 排班变更协调器
    pub coordinator: Arc<Coordinator>,
    /// 团队与成员管理
    pub roster: Arc<RosterService>,
    /// 只读查询
    pub ledger: Arc<LedgerQueries>,
    /// 启动时间 (用于 uptime)
    pub started_at: Instant,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 打开 `work_dir/database/tips.redb` 并装配服务
    pub fn initialize(config: &Config) -> Result<Self> {
        if config.work_dir.trim().is_empty() {
            return Err(ServerError::Config("WORK_DIR must not be empty".into()));
        }

        let path = config.database_path();
        let storage = TipStorage::open(&path)?;
        tracing::info!(path = %path.display(), "Database opened");

        Ok(Self::with_store(config.clone(), Arc::new(storage)))
    }

    /// 使用给定存储装配 (测试使用内存存储)
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let coordinator = Arc::new(Coordinator::new(
            Arc::clone(&store),
            config.cohort_lock_timeout(),
        ));
        let roster = Arc::new(RosterService::new(
            Arc::clone(&store),
            Arc::clone(&coordinator),
        ));
        let ledger = Arc::new(LedgerQueries::new(Arc::clone(&store)));

        Self {
            config,
            store,
            coordinator,
            roster,
            ledger,
            started_at: Instant::now(),
        }
    }

    /// 运行时间 (秒)
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
