//! 服务层
//!
//! # 服务列表
//!
//! - [`RosterService`] - 团队与成员管理 (roster changes resettle cohorts)
//! - [`LedgerQueries`] - 日报 / 周报 / 排班查询
//! - [`https`] - axum 路由与中间件装配

pub mod https;
pub mod ledger;
pub mod roster;

pub use https::{build_app, build_router};
pub use ledger::LedgerQueries;
pub use roster::RosterService;
