//! redb-based storage for teams and team members
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `teams` | `team_id` | `Team` | Team records and member lists |
//! | `team_members` | `member_id` | `TeamMember` | Members with their schedule and tip ledger |
//!
//! Values are JSON-serialized. A team member document embeds its daily
//! totals, weekly totals and work schedule, so a single-member mutation is a
//! single-key write.
//!
//! # Durability
//!
//! redb uses `Durability::Immediate` by default: a commit is persistent as
//! soon as `commit()` returns, and the file is always in a consistent state
//! (copy-on-write with atomic pointer swap).

use chrono::NaiveDate;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{Team, TeamMember};
use shared::util::now_millis;
use std::path::Path;
use std::sync::Arc;

use super::{Batch, RecordStore, StoreError, StoreResult};

/// Table for teams: key = team_id, value = JSON-serialized Team
const TEAMS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("teams");

/// Table for team members: key = member_id, value = JSON-serialized TeamMember
const TEAM_MEMBERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("team_members");

/// Tip ledger storage backed by redb
#[derive(Clone)]
pub struct TipStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for TipStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipStorage").finish_non_exhaustive()
    }
}

impl TipStorage {
    /// Open or create the database at the given path
    ///
    /// The parent directory is created if missing.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TEAMS_TABLE)?;
            let _ = write_txn.open_table(TEAM_MEMBERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read_member(txn: &WriteTransaction, id: i64) -> StoreResult<Option<TeamMember>> {
        let table = txn.open_table(TEAM_MEMBERS_TABLE)?;
        let member = match table.get(id)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };
        Ok(member)
    }

    /// Check the stored revision and write the member with the next one
    fn write_member(txn: &WriteTransaction, mut member: TeamMember) -> StoreResult<TeamMember> {
        let found = Self::read_member(txn, member.id)?
            .map(|m| m.revision)
            .unwrap_or(0);
        if found != member.revision {
            return Err(StoreError::Conflict {
                id: member.id,
                expected: member.revision,
                found,
            });
        }

        member.revision += 1;
        member.updated_at = now_millis();

        let bytes = serde_json::to_vec(&member)?;
        let mut table = txn.open_table(TEAM_MEMBERS_TABLE)?;
        table.insert(member.id, bytes.as_slice())?;
        Ok(member)
    }
}

impl RecordStore for TipStorage {
    fn find_team(&self, id: i64) -> StoreResult<Option<Team>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TEAMS_TABLE)?;
        let team = match table.get(id)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };
        Ok(team)
    }

    fn list_teams(&self) -> StoreResult<Vec<Team>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TEAMS_TABLE)?;
        let mut teams = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            teams.push(serde_json::from_slice(value.value())?);
        }
        Ok(teams)
    }

    fn find_team_member(&self, id: i64) -> StoreResult<Option<TeamMember>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TEAM_MEMBERS_TABLE)?;
        let member = match table.get(id)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };
        Ok(member)
    }

    fn list_team_members(&self) -> StoreResult<Vec<TeamMember>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TEAM_MEMBERS_TABLE)?;
        let mut members = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            members.push(serde_json::from_slice(value.value())?);
        }
        Ok(members)
    }

    fn find_cohort(&self, team_id: i64, date: NaiveDate) -> StoreResult<Vec<TeamMember>> {
        let members = self.list_team_members()?;
        Ok(members
            .into_iter()
            .filter(|m| m.is_on_team(team_id) && m.is_scheduled_on(date))
            .collect())
    }

    fn commit(&self, batch: Batch) -> StoreResult<Vec<TeamMember>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let write_txn = self.db.begin_write()?;
        let mut saved = Vec::with_capacity(batch.members.len());
        {
            // Dropping the transaction without commit aborts it
            for member in batch.members {
                saved.push(Self::write_member(&write_txn, member)?);
            }

            let mut members = write_txn.open_table(TEAM_MEMBERS_TABLE)?;
            for id in &batch.removed_members {
                members.remove(*id)?;
            }

            let mut teams = write_txn.open_table(TEAMS_TABLE)?;
            let now = now_millis();
            for mut team in batch.teams {
                team.updated_at = now;
                let bytes = serde_json::to_vec(&team)?;
                teams.insert(team.id, bytes.as_slice())?;
            }
            for id in &batch.removed_teams {
                teams.remove(*id)?;
            }
        }
        write_txn.commit()?;

        Ok(saved)
    }

    fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(TEAMS_TABLE)?;
        Ok(())
    }
}
