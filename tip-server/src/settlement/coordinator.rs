//! Schedule mutation coordinator
//!
//! Every ledger mutation runs the same sequence:
//!
//! 1. Validate the request (no locks, no writes).
//! 2. Lock every (team, date) cohort the mutation can touch.
//! 3. Apply the single-member change and persist it. This is the durability
//!    boundary: once it commits it is never rolled back.
//! 4. Re-run the allocator for each locked cohort and persist every changed
//!    member in one batch.
//!
//! A failure in step 4 is reported as [`TipError::PartialCommit`] carrying
//! the id of the record saved in step 3.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use shared::models::{
    DailyTotal, DailyTotalCreate, DailyTotalUpdate, TeamMember, WorkScheduleEntry,
};
use shared::util::{now_millis, snowflake_id};

use super::lock::{CohortGuard, CohortKey, CohortLocks};
use crate::db::{RecordStore, StoreError};
use crate::schedule;
use crate::tipout::{CohortEntry, TipError, TipResult, allocate, record, weekly};

/// Attempts for a write that lost an optimistic revision race
const MAX_SAVE_ATTEMPTS: usize = 3;

/// Cohorts a member's records on `dates` are settled in
///
/// Only the primary team counts; a member with no team is in no cohort.
pub fn cohort_keys(member: &TeamMember, dates: &[NaiveDate]) -> BTreeSet<CohortKey> {
    match member.primary_team() {
        Some(team_id) => dates.iter().map(|d| CohortKey::new(team_id, *d)).collect(),
        None => BTreeSet::new(),
    }
}

/// Every date the member has a schedule entry or a daily total for
pub fn ledger_dates(member: &TeamMember) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = member
        .scheduled_dates()
        .into_iter()
        .chain(member.daily_totals.iter().map(|dt| dt.date))
        .collect();
    dates.into_iter().collect()
}

pub struct Coordinator {
    store: Arc<dyn RecordStore>,
    locks: CohortLocks,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(store: Arc<dyn RecordStore>, lock_timeout: Duration) -> Self {
        Self {
            store,
            locks: CohortLocks::new(lock_timeout),
        }
    }

    // ==================== Daily totals ====================

    /// Submit sales for one date, scheduling the date if needed
    pub async fn submit_daily_total(
        &self,
        member_id: i64,
        payload: DailyTotalCreate,
    ) -> TipResult<DailyTotal> {
        let (date, sales) = record::validate_submission(&payload)?;

        let guard = self.lock_member(member_id, |_| Ok(vec![date])).await?;
        let (member, created) = self.commit_member(member_id, |m| {
            record::ensure_unique(m, date)?;
            let dt = record::build(snowflake_id(), m, date, sales, now_millis());
            record::insert_sorted(m, dt.clone());
            schedule::insert_date(m, date);
            weekly::refresh_week(m, date);
            Ok(dt)
        })?;
        tracing::info!(
            member_id,
            date = %date,
            daily_total_id = created.id,
            "Daily total submitted"
        );

        let settled = self
            .settle(&guard, &[(member_id, date)])
            .map_err(|e| self.partial(created.id, e))?;
        Ok(current_daily_total(&settled, &member, created.id).unwrap_or(created))
    }

    /// Patch sales and/or move the record to another date
    pub async fn update_daily_total(
        &self,
        member_id: i64,
        daily_total_id: i64,
        patch: DailyTotalUpdate,
    ) -> TipResult<DailyTotal> {
        let new_date = record::validate_update(&patch)?;

        let guard = self
            .lock_member(member_id, |m| {
                let dt = m
                    .daily_total(daily_total_id)
                    .ok_or_else(|| TipError::daily_total_not_found(daily_total_id))?;
                Ok(std::iter::once(dt.date).chain(new_date).collect())
            })
            .await?;

        let (member, (old_date, updated)) = self.commit_member(member_id, |m| {
            let idx = m
                .daily_totals
                .iter()
                .position(|dt| dt.id == daily_total_id)
                .ok_or_else(|| TipError::daily_total_not_found(daily_total_id))?;
            let old_date = m.daily_totals[idx].date;
            let target = new_date.unwrap_or(old_date);
            if target != old_date {
                record::ensure_unique(m, target)?;
            }

            let mut dt = m.daily_totals.remove(idx);
            record::apply_update(&mut dt, &patch);
            dt.set_date(target);
            dt.updated_at = now_millis();
            record::refresh(&mut dt, m.position);
            record::insert_sorted(m, dt.clone());

            if target != old_date {
                schedule::take_date(m, old_date);
                schedule::insert_date(m, target);
            }
            weekly::refresh_weeks(m, [old_date, target]);
            Ok((old_date, dt))
        })?;
        tracing::info!(
            member_id,
            daily_total_id,
            from = %old_date,
            to = %updated.date,
            "Daily total updated"
        );

        let settled = self
            .settle(&guard, &[(member_id, old_date), (member_id, updated.date)])
            .map_err(|e| self.partial(daily_total_id, e))?;
        Ok(current_daily_total(&settled, &member, daily_total_id).unwrap_or(updated))
    }

    /// Delete a record; its date leaves the schedule
    pub async fn delete_daily_total(&self, member_id: i64, daily_total_id: i64) -> TipResult<()> {
        let guard = self
            .lock_member(member_id, |m| {
                let dt = m
                    .daily_total(daily_total_id)
                    .ok_or_else(|| TipError::daily_total_not_found(daily_total_id))?;
                Ok(vec![dt.date])
            })
            .await?;

        let (_, date) = self.commit_member(member_id, |m| {
            let idx = m
                .daily_totals
                .iter()
                .position(|dt| dt.id == daily_total_id)
                .ok_or_else(|| TipError::daily_total_not_found(daily_total_id))?;
            let removed = m.daily_totals.remove(idx);
            schedule::take_date(m, removed.date);
            weekly::refresh_week(m, removed.date);
            Ok(removed.date)
        })?;
        tracing::info!(member_id, daily_total_id, date = %date, "Daily total deleted");

        self.settle(&guard, &[])
            .map_err(|e| self.partial(daily_total_id, e))?;
        Ok(())
    }

    // ==================== Work schedule ====================

    pub async fn add_schedule_date(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> TipResult<Vec<WorkScheduleEntry>> {
        let guard = self.lock_member(member_id, |_| Ok(vec![date])).await?;
        let (member, ()) = self.commit_member(member_id, |m| schedule::add_date(m, date))?;
        tracing::info!(member_id, date = %date, "Schedule date added");

        self.settle(&guard, &[(member_id, date)])
            .map_err(|e| self.partial(member_id, e))?;
        Ok(member.work_schedule)
    }

    /// Unschedule a date. A daily total on that date is kept but detached
    /// from its cohort.
    pub async fn remove_schedule_date(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> TipResult<Vec<WorkScheduleEntry>> {
        let guard = self.lock_member(member_id, |_| Ok(vec![date])).await?;
        let (member, ()) = self.commit_member(member_id, |m| schedule::remove_date(m, date))?;
        tracing::info!(member_id, date = %date, "Schedule date removed");

        self.settle(&guard, &[(member_id, date)])
            .map_err(|e| self.partial(member_id, e))?;
        Ok(member.work_schedule)
    }

    /// Unschedule every date of a month, returning the removed dates
    pub async fn remove_schedule_month(
        &self,
        member_id: i64,
        year: i32,
        month: u32,
    ) -> TipResult<Vec<NaiveDate>> {
        crate::utils::time::validate_month(month)?;

        let month_dates = |m: &TeamMember| -> TipResult<Vec<NaiveDate>> {
            schedule::month(m, year, month)
                .map(|e| e.dates.clone())
                .ok_or_else(|| TipError::schedule_month_not_found(year, month))
        };
        let guard = self.lock_member(member_id, month_dates).await?;
        let (_, removed) = self.commit_member(member_id, |m| {
            let removed = schedule::remove_month(m, year, month);
            if removed.is_empty() {
                return Err(TipError::schedule_month_not_found(year, month));
            }
            Ok(removed)
        })?;
        tracing::info!(
            member_id,
            year,
            month,
            dates = removed.len(),
            "Schedule month removed"
        );

        let subjects: Vec<(i64, NaiveDate)> = removed.iter().map(|d| (member_id, *d)).collect();
        self.settle(&guard, &subjects)
            .map_err(|e| self.partial(member_id, e))?;
        Ok(removed)
    }

    // ==================== Building blocks ====================

    /// Lock an explicit set of cohorts
    pub async fn lock(&self, keys: BTreeSet<CohortKey>) -> TipResult<CohortGuard> {
        self.locks.acquire(keys).await
    }

    /// Lock the cohorts of a member's `dates`.
    ///
    /// Membership can change while waiting, so the keys are checked again
    /// against a fresh read once the locks are held.
    async fn lock_member<F>(&self, member_id: i64, dates: F) -> TipResult<CohortGuard>
    where
        F: Fn(&TeamMember) -> TipResult<Vec<NaiveDate>>,
    {
        for _ in 0..MAX_SAVE_ATTEMPTS {
            let member = self.load_member(member_id)?;
            let keys = cohort_keys(&member, &dates(&member)?);
            let guard = self.locks.acquire(keys).await?;

            let fresh = self.load_member(member_id)?;
            if guard.covers(&cohort_keys(&fresh, &dates(&fresh)?)) {
                return Ok(guard);
            }
            tracing::debug!(member_id, "Membership changed while waiting for cohort locks, retrying");
        }
        Err(TipError::Conflict(member_id))
    }

    fn load_member(&self, member_id: i64) -> TipResult<TeamMember> {
        self.store
            .find_team_member(member_id)?
            .ok_or_else(|| TipError::member_not_found(member_id))
    }

    /// Read, mutate and save one member, retrying on a revision race
    pub(crate) fn commit_member<T>(
        &self,
        member_id: i64,
        mut mutate: impl FnMut(&mut TeamMember) -> TipResult<T>,
    ) -> TipResult<(TeamMember, T)> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut member = self.load_member(member_id)?;
            let value = mutate(&mut member)?;
            match self.store.save_team_member(member) {
                Ok(saved) => return Ok((saved, value)),
                Err(StoreError::Conflict { .. }) if attempt < MAX_SAVE_ATTEMPTS => {
                    tracing::debug!(member_id, attempt, "Revision conflict, reapplying mutation");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Re-run the allocator for every cohort held by `guard` and persist
    /// the changed members in one batch.
    ///
    /// `subjects` are (member, date) records that must carry no pooled
    /// amounts if they no longer belong to any cohort.
    pub fn settle(
        &self,
        guard: &CohortGuard,
        subjects: &[(i64, NaiveDate)],
    ) -> TipResult<Vec<TeamMember>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.settle_once(guard.keys(), subjects) {
                Err(TipError::Conflict(id)) if attempt < MAX_SAVE_ATTEMPTS => {
                    tracing::debug!(member_id = id, attempt, "Revision conflict while settling, retrying");
                }
                other => return other,
            }
        }
    }

    fn settle_once(
        &self,
        keys: &BTreeSet<CohortKey>,
        subjects: &[(i64, NaiveDate)],
    ) -> TipResult<Vec<TeamMember>> {
        let mut touched: BTreeMap<i64, TeamMember> = BTreeMap::new();
        let mut changed: BTreeSet<i64> = BTreeSet::new();
        let mut covered: HashSet<(i64, NaiveDate)> = HashSet::new();

        for key in keys {
            let mut cohort = Vec::new();
            for member in self.store.find_cohort(key.team_id, key.date)? {
                if member.primary_team() != Some(key.team_id) {
                    tracing::debug!(
                        member_id = member.id,
                        team_id = key.team_id,
                        "Member settles with their primary team, skipped"
                    );
                    continue;
                }
                let member = touched.entry(member.id).or_insert(member);
                match member.daily_total_on(key.date) {
                    Some(dt) => {
                        covered.insert((member.id, key.date));
                        cohort.push(CohortEntry {
                            member_id: member.id,
                            position: member.position,
                            daily_total: dt.clone(),
                        });
                    }
                    None => tracing::debug!(
                        member_id = member.id,
                        date = %key.date,
                        "Scheduled without a daily total, skipped"
                    ),
                }
            }

            let allocation = allocate(&cohort);
            tracing::debug!(
                team_id = key.team_id,
                date = %key.date,
                cohort = cohort.len(),
                pools = ?allocation.pools,
                "Cohort allocated"
            );

            for (entry, dt) in allocation.changed(&cohort) {
                if let Some(member) = touched.get_mut(&entry.member_id)
                    && let Some(slot) = member.daily_total_on_mut(key.date)
                {
                    *slot = dt.clone();
                    weekly::refresh_week(member, key.date);
                    changed.insert(entry.member_id);
                }
            }
        }

        for &(member_id, date) in subjects {
            if covered.contains(&(member_id, date)) {
                continue;
            }
            let member = match touched.entry(member_id) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => match self.store.find_team_member(member_id)? {
                    Some(m) => e.insert(m),
                    None => continue,
                },
            };
            if member.daily_total_on(date).is_none() {
                continue;
            }
            if member.primary_team().is_some() && member.is_scheduled_on(date) {
                tracing::warn!(
                    member_id,
                    date = %date,
                    "Record belongs to a cohort outside the locked scope, left as is"
                );
                continue;
            }
            if let Some(dt) = member.daily_total_on_mut(date) {
                let before = dt.clone();
                record::detach(dt);
                if *dt != before {
                    weekly::refresh_week(member, date);
                    changed.insert(member_id);
                    tracing::debug!(member_id, date = %date, "Daily total detached from cohort");
                }
            }
        }

        let batch: Vec<TeamMember> = changed
            .iter()
            .filter_map(|id| touched.remove(id))
            .collect();
        if !batch.is_empty() {
            tracing::info!(members = batch.len(), "Tip-outs resettled");
        }
        Ok(self.store.save_team_members(batch)?)
    }

    fn partial(&self, record_id: i64, err: TipError) -> TipError {
        tracing::warn!(record_id, error = %err, "Mutation committed but cohort resettlement failed");
        TipError::partial(record_id, err)
    }
}

/// The settled version of a record if the allocator touched it
fn current_daily_total(
    settled: &[TeamMember],
    committed: &TeamMember,
    daily_total_id: i64,
) -> Option<DailyTotal> {
    settled
        .iter()
        .find(|m| m.id == committed.id)
        .unwrap_or(committed)
        .daily_total(daily_total_id)
        .cloned()
}
