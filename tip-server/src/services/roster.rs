//! 团队与成员管理
//!
//! Roster writes change which cohort a member's records settle in, so each
//! one locks the cohorts of the member's dates both before and after the
//! change, commits the roster update in one batch, then resettles those
//! cohorts. Roster writes are serialized among themselves by `write_lock`.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{
    MemberSchedule, Position, Team, TeamCreate, TeamMember, TeamMemberCreate, TeamMemberUpdate,
    TeamUpdate,
};
use shared::util::{now_millis, snowflake_id};
use tokio::sync::Mutex;

use crate::db::{Batch, RecordStore, StoreError};
use crate::settlement::{CohortGuard, CohortKey, Coordinator, cohort_keys, ledger_dates};
use crate::tipout::{TipError, TipResult, record, weekly};
use crate::utils::validation::{MAX_NAME_LEN, capitalize_name, validate_required_text};

const MAX_ATTEMPTS: usize = 3;

/// Cohorts a member's ledger dates settle in, before and after a change
fn transition_keys(before: &TeamMember, after: &TeamMember) -> BTreeSet<CohortKey> {
    let mut keys = cohort_keys(before, &ledger_dates(before));
    keys.extend(cohort_keys(after, &ledger_dates(after)));
    keys
}

/// Every (member, date) a member has on the ledger
fn ledger_subjects(member: &TeamMember) -> Vec<(i64, NaiveDate)> {
    ledger_dates(member)
        .into_iter()
        .map(|d| (member.id, d))
        .collect()
}

fn validate_name(value: Option<&str>, field: &str) -> TipResult<String> {
    let value = value.ok_or_else(|| TipError::required(field))?;
    validate_required_text(value, field, MAX_NAME_LEN)?;
    Ok(value.trim().to_string())
}

fn parse_position(value: &str) -> TipResult<Position> {
    Position::from_str(value).map_err(|e| {
        tracing::warn!(position = %e.0, "Rejected unknown position");
        TipError::unknown_position(value)
    })
}

pub struct RosterService {
    store: Arc<dyn RecordStore>,
    coordinator: Arc<Coordinator>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for RosterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterService").finish_non_exhaustive()
    }
}

impl RosterService {
    pub fn new(store: Arc<dyn RecordStore>, coordinator: Arc<Coordinator>) -> Self {
        Self {
            store,
            coordinator,
            write_lock: Mutex::new(()),
        }
    }

    // ==================== Teams ====================

    pub async fn create_team(&self, payload: TeamCreate) -> TipResult<Team> {
        let name = validate_name(payload.name.as_deref(), "name")?;

        let _w = self.write_lock.lock().await;
        self.ensure_team_name_free(&name, None)?;

        let now = now_millis();
        let team = Team {
            id: snowflake_id(),
            name,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.store.save_team(team.clone())?;
        tracing::info!(team_id = team.id, name = %team.name, "Team created");
        Ok(team)
    }

    /// Teams ordered by name
    pub fn list_teams(&self) -> TipResult<Vec<Team>> {
        let mut teams = self.store.list_teams()?;
        teams.sort_by_key(|t| t.name.to_lowercase());
        Ok(teams)
    }

    pub fn get_team(&self, id: i64) -> TipResult<Team> {
        self.store
            .find_team(id)?
            .ok_or_else(|| TipError::team_not_found(id))
    }

    pub async fn rename_team(&self, id: i64, payload: TeamUpdate) -> TipResult<Team> {
        let name = validate_name(payload.name.as_deref(), "name")?;

        let _w = self.write_lock.lock().await;
        let mut team = self.get_team(id)?;
        self.ensure_team_name_free(&name, Some(id))?;

        team.name = name;
        self.store.save_team(team.clone())?;
        tracing::info!(team_id = id, name = %team.name, "Team renamed");
        self.get_team(id)
    }

    /// Delete a team and drop it from every member, then resettle the
    /// members' dates under whatever team is now primary for them.
    pub async fn delete_team(&self, id: i64) -> TipResult<()> {
        let _w = self.write_lock.lock().await;

        for attempt in 1..=MAX_ATTEMPTS {
            let team = self.get_team(id)?;
            let leave = |m: &TeamMember| {
                let mut after = m.clone();
                after.teams.retain(|t| *t != id);
                after
            };
            let (guard, members) = self
                .lock_members(&team.members, |m| transition_keys(m, &leave(m)))
                .await?;

            let mut batch = Batch::new().remove_team(id);
            let mut subjects = Vec::new();
            for member in &members {
                subjects.extend(ledger_subjects(member));
                batch = batch.save_member(leave(member));
            }

            match self.store.commit(batch) {
                Ok(_) => {
                    tracing::info!(team_id = id, members = members.len(), "Team deleted");
                    return self.resettle(&guard, &subjects, id);
                }
                Err(StoreError::Conflict { .. }) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(team_id = id, attempt, "Revision conflict deleting team, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(TipError::Conflict(id))
    }

    fn ensure_team_name_free(&self, name: &str, except: Option<i64>) -> TipResult<()> {
        let taken = self
            .store
            .list_teams()?
            .iter()
            .any(|t| Some(t.id) != except && t.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(TipError::team_name_exists(name));
        }
        Ok(())
    }

    // ==================== Membership ====================

    /// Put a member on a team. Adding an existing member is a no-op.
    pub async fn add_member_to_team(&self, team_id: i64, member_id: i64) -> TipResult<TeamMember> {
        let _w = self.write_lock.lock().await;

        for attempt in 1..=MAX_ATTEMPTS {
            let mut team = self.get_team(team_id)?;
            let join = |m: &TeamMember| {
                let mut after = m.clone();
                if !after.is_on_team(team_id) {
                    after.teams.push(team_id);
                }
                after
            };
            let (guard, mut members) = self
                .lock_members(&[member_id], |m| transition_keys(m, &join(m)))
                .await?;
            let member = members
                .pop()
                .ok_or_else(|| TipError::member_not_found(member_id))?;

            if member.is_on_team(team_id) && team.has_member(member_id) {
                return Ok(member);
            }

            if !team.has_member(member_id) {
                team.members.push(member_id);
            }
            let subjects = ledger_subjects(&member);
            let batch = Batch::new().save_team(team).save_member(join(&member));

            match self.store.commit(batch) {
                Ok(saved) => {
                    tracing::info!(team_id, member_id, "Member added to team");
                    self.resettle(&guard, &subjects, member_id)?;
                    return self.refetch(saved, member_id);
                }
                Err(StoreError::Conflict { .. }) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(member_id, attempt, "Revision conflict joining team, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(TipError::Conflict(member_id))
    }

    pub async fn remove_member_from_team(
        &self,
        team_id: i64,
        member_id: i64,
    ) -> TipResult<TeamMember> {
        let _w = self.write_lock.lock().await;

        for attempt in 1..=MAX_ATTEMPTS {
            let mut team = self.get_team(team_id)?;
            let leave = |m: &TeamMember| {
                let mut after = m.clone();
                after.teams.retain(|t| *t != team_id);
                after
            };
            let (guard, mut members) = self
                .lock_members(&[member_id], |m| transition_keys(m, &leave(m)))
                .await?;
            let member = members
                .pop()
                .ok_or_else(|| TipError::member_not_found(member_id))?;

            if !member.is_on_team(team_id) && !team.has_member(member_id) {
                return Err(TipError::not_on_team(member_id, team_id));
            }

            team.members.retain(|id| *id != member_id);
            let subjects = ledger_subjects(&member);
            let batch = Batch::new().save_team(team).save_member(leave(&member));

            match self.store.commit(batch) {
                Ok(saved) => {
                    tracing::info!(team_id, member_id, "Member removed from team");
                    self.resettle(&guard, &subjects, member_id)?;
                    return self.refetch(saved, member_id);
                }
                Err(StoreError::Conflict { .. }) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(member_id, attempt, "Revision conflict leaving team, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(TipError::Conflict(member_id))
    }

    // ==================== Members ====================

    pub async fn create_team_member(&self, payload: TeamMemberCreate) -> TipResult<TeamMember> {
        let first_name = capitalize_name(&validate_name(payload.first_name.as_deref(), "first_name")?);
        let last_name = capitalize_name(&validate_name(payload.last_name.as_deref(), "last_name")?);
        let position = parse_position(
            payload
                .position
                .as_deref()
                .ok_or_else(|| TipError::required("position"))?,
        )?;

        let mut team_ids: Vec<i64> = Vec::with_capacity(payload.teams.len());
        for id in payload.teams {
            if !team_ids.contains(&id) {
                team_ids.push(id);
            }
        }

        let _w = self.write_lock.lock().await;
        let now = now_millis();
        let member = TeamMember {
            id: snowflake_id(),
            first_name,
            last_name,
            position,
            teams: team_ids.clone(),
            daily_totals: Vec::new(),
            weekly_totals: Vec::new(),
            work_schedule: Vec::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        };

        let mut batch = Batch::new().save_member(member.clone());
        for team_id in &team_ids {
            let mut team = self.get_team(*team_id)?;
            team.members.push(member.id);
            batch = batch.save_team(team);
        }
        let saved = self.store.commit(batch)?;
        tracing::info!(
            member_id = member.id,
            position = %member.position,
            teams = team_ids.len(),
            "Team member created"
        );
        self.refetch(saved, member.id)
    }

    pub fn list_team_members(&self) -> TipResult<Vec<TeamMember>> {
        let mut members = self.store.list_team_members()?;
        members.sort_by(|a, b| {
            (a.last_name.to_lowercase(), a.first_name.to_lowercase())
                .cmp(&(b.last_name.to_lowercase(), b.first_name.to_lowercase()))
        });
        Ok(members)
    }

    pub fn get_team_member(&self, id: i64) -> TipResult<TeamMember> {
        self.store
            .find_team_member(id)?
            .ok_or_else(|| TipError::member_not_found(id))
    }

    /// Rename and/or change position. A position change recomputes the
    /// potential tip-outs of every record and resettles the member's dates.
    pub async fn update_team_member(
        &self,
        id: i64,
        payload: TeamMemberUpdate,
    ) -> TipResult<TeamMember> {
        let first_name = match payload.first_name.as_deref() {
            Some(v) => Some(capitalize_name(&validate_name(Some(v), "first_name")?)),
            None => None,
        };
        let last_name = match payload.last_name.as_deref() {
            Some(v) => Some(capitalize_name(&validate_name(Some(v), "last_name")?)),
            None => None,
        };
        let position = payload.position.as_deref().map(parse_position).transpose()?;

        let rename = |m: &mut TeamMember| {
            if let Some(first) = &first_name {
                m.first_name = first.clone();
            }
            if let Some(last) = &last_name {
                m.last_name = last.clone();
            }
        };

        let _w = self.write_lock.lock().await;
        let current = self.get_team_member(id)?;
        let Some(position) = position.filter(|p| *p != current.position) else {
            let (saved, ()) = self.coordinator.commit_member(id, |m| {
                rename(m);
                Ok(())
            })?;
            tracing::info!(member_id = id, "Team member updated");
            return Ok(saved);
        };

        let (guard, _) = self
            .lock_members(&[id], |m| cohort_keys(m, &ledger_dates(m)))
            .await?;
        let (saved, ()) = self.coordinator.commit_member(id, |m| {
            rename(m);
            m.position = position;
            for dt in &mut m.daily_totals {
                record::refresh(dt, position);
            }
            let dates: Vec<NaiveDate> = m.daily_totals.iter().map(|dt| dt.date).collect();
            weekly::refresh_weeks(m, dates);
            Ok(())
        })?;
        tracing::info!(member_id = id, position = %position, "Team member position changed");

        let subjects = ledger_subjects(&saved);
        let settled = self.resettle_returning(&guard, &subjects, id)?;
        Ok(settled
            .into_iter()
            .find(|m| m.id == id)
            .unwrap_or(saved))
    }

    /// Delete a member and drop them from every team
    pub async fn delete_team_member(&self, id: i64) -> TipResult<()> {
        let _w = self.write_lock.lock().await;

        for attempt in 1..=MAX_ATTEMPTS {
            let (guard, mut members) = self
                .lock_members(&[id], |m| cohort_keys(m, &ledger_dates(m)))
                .await?;
            let member = members.pop().ok_or_else(|| TipError::member_not_found(id))?;

            let mut batch = Batch::new().remove_member(id);
            for team_id in &member.teams {
                match self.store.find_team(*team_id)? {
                    Some(mut team) => {
                        team.members.retain(|m| *m != id);
                        batch = batch.save_team(team);
                    }
                    None => tracing::warn!(member_id = id, team_id, "Member references a missing team"),
                }
            }

            match self.store.commit(batch) {
                Ok(_) => {
                    tracing::info!(member_id = id, "Team member deleted");
                    return self.resettle(&guard, &[], id);
                }
                Err(StoreError::Conflict { .. }) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(member_id = id, attempt, "Revision conflict deleting member, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(TipError::Conflict(id))
    }

    /// Schedules of every member on a team
    pub fn team_work_schedules(&self, team_id: i64) -> TipResult<Vec<MemberSchedule>> {
        let team = self.get_team(team_id)?;
        let mut schedules = Vec::with_capacity(team.members.len());
        for member_id in &team.members {
            let Some(m) = self.store.find_team_member(*member_id)? else {
                tracing::warn!(team_id, member_id, "Team references a missing member");
                continue;
            };
            schedules.push(MemberSchedule {
                team_member_id: m.id,
                first_name: m.first_name,
                last_name: m.last_name,
                position: m.position,
                work_schedule: m.work_schedule,
            });
        }
        Ok(schedules)
    }

    // ==================== Helpers ====================

    fn load_members(&self, ids: &[i64]) -> TipResult<Vec<TeamMember>> {
        let mut members = Vec::with_capacity(ids.len());
        for id in ids {
            match self.store.find_team_member(*id)? {
                Some(m) => members.push(m),
                None if ids.len() == 1 => return Err(TipError::member_not_found(*id)),
                None => tracing::warn!(member_id = id, "Skipping missing team member"),
            }
        }
        Ok(members)
    }

    /// Lock the cohorts `keys` yields for each member, re-reading the
    /// members once the locks are held.
    async fn lock_members<F>(
        &self,
        ids: &[i64],
        keys: F,
    ) -> TipResult<(CohortGuard, Vec<TeamMember>)>
    where
        F: Fn(&TeamMember) -> BTreeSet<CohortKey>,
    {
        let union = |members: &[TeamMember]| -> BTreeSet<CohortKey> {
            members.iter().flat_map(&keys).collect()
        };

        for _ in 0..MAX_ATTEMPTS {
            let wanted = union(&self.load_members(ids)?);
            let guard = self.coordinator.lock(wanted).await?;

            let fresh = self.load_members(ids)?;
            if guard.covers(&union(&fresh)) {
                return Ok((guard, fresh));
            }
            tracing::debug!(members = ids.len(), "Ledger changed while waiting for cohort locks, retrying");
        }
        Err(TipError::Conflict(ids.first().copied().unwrap_or_default()))
    }

    fn resettle(
        &self,
        guard: &CohortGuard,
        subjects: &[(i64, NaiveDate)],
        record_id: i64,
    ) -> TipResult<()> {
        self.resettle_returning(guard, subjects, record_id).map(|_| ())
    }

    fn resettle_returning(
        &self,
        guard: &CohortGuard,
        subjects: &[(i64, NaiveDate)],
        record_id: i64,
    ) -> TipResult<Vec<TeamMember>> {
        self.coordinator.settle(guard, subjects).map_err(|e| {
            tracing::warn!(record_id, error = %e, "Roster change committed but cohort resettlement failed");
            TipError::partial(record_id, e)
        })
    }

    /// The freshest copy of a member after a commit
    fn refetch(&self, saved: Vec<TeamMember>, id: i64) -> TipResult<TeamMember> {
        match self.store.find_team_member(id)? {
            Some(m) => Ok(m),
            None => saved
                .into_iter()
                .find(|m| m.id == id)
                .ok_or_else(|| TipError::member_not_found(id)),
        }
    }
}
