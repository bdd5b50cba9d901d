//! Per-(team, date) lock scope
//!
//! Each cohort has its own async mutex, created on first use. A request
//! acquires every cohort it touches in key order, so two requests that share
//! cohorts can never wait on each other in a cycle. Different cohorts
//! proceed in parallel.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;

use crate::tipout::{TipError, TipResult};

/// Idle lock entries are pruned once the map grows past this
const PRUNE_THRESHOLD: usize = 1024;

/// Scope of one allocator run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CohortKey {
    pub team_id: i64,
    pub date: NaiveDate,
}

impl CohortKey {
    pub fn new(team_id: i64, date: NaiveDate) -> Self {
        Self { team_id, date }
    }
}

/// Held cohort locks; released on drop
pub struct CohortGuard {
    keys: BTreeSet<CohortKey>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl CohortGuard {
    pub fn keys(&self) -> &BTreeSet<CohortKey> {
        &self.keys
    }

    pub fn covers(&self, keys: &BTreeSet<CohortKey>) -> bool {
        keys.is_subset(&self.keys)
    }
}

impl std::fmt::Debug for CohortGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohortGuard").field("keys", &self.keys).finish()
    }
}

#[derive(Debug)]
pub struct CohortLocks {
    locks: DashMap<CohortKey, Arc<Mutex<()>>>,
    timeout: Duration,
}

impl CohortLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            timeout,
        }
    }

    fn handle(&self, key: CohortKey) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Drop entries nobody holds or waits on
    fn prune_idle(&self) {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
    }

    /// Acquire every key in order, or fail with `Contention` once the
    /// timeout elapses. Locks taken before the timeout are released.
    pub async fn acquire(&self, keys: BTreeSet<CohortKey>) -> TipResult<CohortGuard> {
        self.prune_idle();

        let deadline = Instant::now() + self.timeout;
        let mut guards = Vec::with_capacity(keys.len());
        for key in &keys {
            let lock = self.handle(*key);
            match tokio::time::timeout_at(deadline, lock.lock_owned()).await {
                Ok(guard) => guards.push(guard),
                Err(_) => {
                    tracing::warn!(
                        team_id = key.team_id,
                        date = %key.date,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Timed out waiting for cohort lock"
                    );
                    return Err(TipError::Contention {
                        team_id: key.team_id,
                        date: key.date,
                    });
                }
            }
        }

        Ok(CohortGuard {
            keys,
            _guards: guards,
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}
