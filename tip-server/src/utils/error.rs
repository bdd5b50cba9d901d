//! 统一错误处理
//!
//! Re-exports the shared error system so handlers only import from
//! `crate::utils`.
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::new(ErrorCode::TeamNotFound).with_detail("team_id", id))
//!
//! // 返回成功响应
//! Ok(Json(team))
//! ```

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse};
