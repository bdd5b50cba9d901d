//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`teams`] - 团队管理接口
//! - [`team_members`] - 成员管理接口
//! - [`daily_totals`] - 日报接口 (触发 tip-out 重算)
//! - [`weekly_totals`] - 周报查询接口
//! - [`work_schedule`] - 排班接口 (触发 tip-out 重算)

pub mod daily_totals;
pub mod health;
pub mod team_members;
pub mod teams;
pub mod weekly_totals;
pub mod work_schedule;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
