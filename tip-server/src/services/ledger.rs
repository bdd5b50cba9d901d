//! Read-only ledger queries

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{DailyTotal, TeamMember, WeeklyTotal, WorkScheduleEntry};

use crate::db::RecordStore;
use crate::schedule;
use crate::tipout::{TipError, TipResult};
use crate::utils::time::validate_month;

pub struct LedgerQueries {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for LedgerQueries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerQueries").finish_non_exhaustive()
    }
}

impl LedgerQueries {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn member(&self, id: i64) -> TipResult<TeamMember> {
        self.store
            .find_team_member(id)?
            .ok_or_else(|| TipError::member_not_found(id))
    }

    pub fn list_daily_totals(&self, member_id: i64) -> TipResult<Vec<DailyTotal>> {
        Ok(self.member(member_id)?.daily_totals)
    }

    pub fn get_daily_total(&self, member_id: i64, daily_total_id: i64) -> TipResult<DailyTotal> {
        self.member(member_id)?
            .daily_totals
            .into_iter()
            .find(|dt| dt.id == daily_total_id)
            .ok_or_else(|| TipError::daily_total_not_found(daily_total_id))
    }

    /// Every member's daily totals, by date then member
    pub fn list_all_daily_totals(&self) -> TipResult<Vec<DailyTotal>> {
        let mut all: Vec<DailyTotal> = self
            .store
            .list_team_members()?
            .into_iter()
            .flat_map(|m| m.daily_totals)
            .collect();
        all.sort_by_key(|dt| (dt.date, dt.team_member_id));
        Ok(all)
    }

    pub fn list_weekly_totals(&self, member_id: i64) -> TipResult<Vec<WeeklyTotal>> {
        Ok(self.member(member_id)?.weekly_totals)
    }

    /// The weekly total of the week containing `date`
    pub fn get_weekly_total(&self, member_id: i64, date: NaiveDate) -> TipResult<WeeklyTotal> {
        self.member(member_id)?
            .weekly_totals
            .into_iter()
            .find(|w| w.contains(date))
            .ok_or_else(|| TipError::weekly_total_not_found(date))
    }

    pub fn get_work_schedule(&self, member_id: i64) -> TipResult<Vec<WorkScheduleEntry>> {
        Ok(self.member(member_id)?.work_schedule)
    }

    pub fn get_work_schedule_for_month(
        &self,
        member_id: i64,
        year: i32,
        month: u32,
    ) -> TipResult<WorkScheduleEntry> {
        validate_month(month)?;
        let member = self.member(member_id)?;
        schedule::month(&member, year, month)
            .cloned()
            .ok_or_else(|| TipError::schedule_month_not_found(year, month))
    }
}
