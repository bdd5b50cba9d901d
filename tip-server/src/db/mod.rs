//! 数据存储层
//!
//! [`RecordStore`] is the seam between the settlement logic and persistence.
//! [`TipStorage`] implements it on an embedded redb database.
//!
//! Every write goes through [`RecordStore::commit`], which applies a
//! [`Batch`] in a single transaction and enforces optimistic concurrency on
//! team members via their `revision` counter.

pub mod storage;

pub use storage::TipStorage;

use chrono::NaiveDate;
use shared::models::{Team, TeamMember};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Team member {id} revision conflict: expected {expected}, found {found}")]
    Conflict { id: i64, expected: u64, found: u64 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A set of writes applied atomically
///
/// Members carry the revision they were read at; the store rejects the whole
/// batch if any of them changed in the meantime.
#[derive(Debug, Default, Clone)]
pub struct Batch {
    pub teams: Vec<Team>,
    pub members: Vec<TeamMember>,
    pub removed_teams: Vec<i64>,
    pub removed_members: Vec<i64>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    pub fn save_member(mut self, member: TeamMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn remove_team(mut self, id: i64) -> Self {
        self.removed_teams.push(id);
        self
    }

    pub fn remove_member(mut self, id: i64) -> Self {
        self.removed_members.push(id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
            && self.members.is_empty()
            && self.removed_teams.is_empty()
            && self.removed_members.is_empty()
    }
}

/// Keyed access to teams and team members
pub trait RecordStore: Send + Sync {
    fn find_team(&self, id: i64) -> StoreResult<Option<Team>>;

    fn list_teams(&self) -> StoreResult<Vec<Team>>;

    fn find_team_member(&self, id: i64) -> StoreResult<Option<TeamMember>>;

    fn list_team_members(&self) -> StoreResult<Vec<TeamMember>>;

    /// Members of `team_id` whose work schedule contains `date`
    fn find_cohort(&self, team_id: i64, date: NaiveDate) -> StoreResult<Vec<TeamMember>>;

    /// Apply every write of the batch in one transaction.
    ///
    /// Returns the saved members with their new revisions, in batch order.
    fn commit(&self, batch: Batch) -> StoreResult<Vec<TeamMember>>;

    /// Cheap liveness probe for health checks
    fn ping(&self) -> StoreResult<()>;

    fn save_team(&self, team: Team) -> StoreResult<()> {
        self.commit(Batch::new().save_team(team)).map(|_| ())
    }

    fn save_team_member(&self, member: TeamMember) -> StoreResult<TeamMember> {
        let mut saved = self.commit(Batch::new().save_member(member))?;
        Ok(saved.remove(0))
    }

    fn save_team_members(&self, members: Vec<TeamMember>) -> StoreResult<Vec<TeamMember>> {
        if members.is_empty() {
            return Ok(Vec::new());
        }
        self.commit(Batch {
            members,
            ..Batch::default()
        })
    }
}
