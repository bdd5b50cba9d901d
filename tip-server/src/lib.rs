//! Tip Server - 餐厅小费分配账本
//!
//! # 架构概述
//!
//! Servers tip out a fixed share of their sales to the bartenders, runners
//! and hosts working the same team on the same day. Every change to a daily
//! total or a work schedule resettles the affected (team, date) cohorts.
//!
//! # 模块结构
//!
//! ```text
//! tip-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── tipout/        # 费率、日报字段、分组、分配、周报 (纯逻辑)
//! ├── schedule/      # 排班日期操作
//! ├── settlement/    # cohort 锁与变更协调
//! ├── db/            # redb 存储
//! ├── services/      # 团队/成员管理、查询、路由装配
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、日期、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod schedule;
pub mod services;
pub mod settlement;
pub mod tipout;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use db::{RecordStore, TipStorage};
pub use services::build_router;
pub use settlement::Coordinator;
pub use tipout::{TipError, TipResult};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorCategory, ErrorCode, ErrorResponse};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
 _____ _
|_   _(_)_ __
  | | | | '_ \
  | | | | |_) |
  |_| |_| .__/
        |_|   ledger
    "#
    );
}
