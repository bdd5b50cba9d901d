//! Data models
//!
//! Shared between tip-server and API clients.
//! All IDs are `i64` (snowflake), timestamps are Unix millis.

pub mod daily_total;
pub mod position;
pub mod schedule;
pub mod team;
pub mod team_member;
pub mod weekly_total;

// Re-exports
pub use daily_total::*;
pub use position::*;
pub use schedule::*;
pub use team::*;
pub use team_member::*;
pub use weekly_total::*;
