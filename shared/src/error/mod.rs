//! Unified error system for the tip ledger
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorResponse`]: JSON body sent for failed requests
//!
//! # Error Code Ranges
//!
//! - 0xxx: Input errors
//! - 1xxx: Team errors
//! - 2xxx: Team member errors
//! - 3xxx: Daily / weekly total errors
//! - 4xxx: Work schedule errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::with_message(ErrorCode::DailyTotalExists, "2024-01-10 already submitted")
//!     .with_detail("date", "2024-01-10");
//!
//! let body = ErrorResponse::from(&err);
//! assert_eq!(body.code, 3002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, AppResult, ErrorResponse};
