//! Settlement - locking, persistence and allocator orchestration

pub mod coordinator;
pub mod lock;

pub use coordinator::{Coordinator, cohort_keys, ledger_dates};
pub use lock::{CohortGuard, CohortKey, CohortLocks};
