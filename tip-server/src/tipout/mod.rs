//! Tip-out domain logic
//!
//! - [`rates`] - fixed tip-out percentages
//! - [`record`] - daily total validation and derived fields
//! - [`partition`] - cohort split by position
//! - [`allocator`] - pooled redistribution for one (team, date) cohort
//! - [`weekly`] - Monday-start weekly rollup
//!
//! Everything here is synchronous and free of I/O; persistence and locking
//! live in [`crate::settlement`].

pub mod allocator;
pub mod error;
pub mod money;
pub mod partition;
pub mod rates;
pub mod record;
pub mod weekly;

pub use allocator::{Allocation, allocate};
pub use error::{TipError, TipResult};
pub use partition::{CohortEntry, Partition};
