//! Team Member Model

use super::{DailyTotal, Position, WeeklyTotal, WorkScheduleEntry};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Staff member with their schedule and tip ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    /// Team ids, unique
    #[serde(default)]
    pub teams: Vec<i64>,
    /// Sorted by date, unique by date
    #[serde(default)]
    pub daily_totals: Vec<DailyTotal>,
    /// Sorted by week start
    #[serde(default)]
    pub weekly_totals: Vec<WeeklyTotal>,
    /// Sorted by (year, month)
    #[serde(default)]
    pub work_schedule: Vec<WorkScheduleEntry>,
    /// Optimistic concurrency counter, bumped by the store on every save
    #[serde(default)]
    pub revision: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TeamMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn daily_total_on(&self, date: NaiveDate) -> Option<&DailyTotal> {
        self.daily_totals.iter().find(|dt| dt.date == date)
    }

    pub fn daily_total_on_mut(&mut self, date: NaiveDate) -> Option<&mut DailyTotal> {
        self.daily_totals.iter_mut().find(|dt| dt.date == date)
    }

    pub fn daily_total(&self, id: i64) -> Option<&DailyTotal> {
        self.daily_totals.iter().find(|dt| dt.id == id)
    }

    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.work_schedule
            .iter()
            .any(|e| e.year == date.year() && e.month == date.month() && e.dates.contains(&date))
    }

    pub fn is_on_team(&self, team_id: i64) -> bool {
        self.teams.contains(&team_id)
    }

    /// The first team joined. A member on several teams is settled with
    /// this team's cohort only.
    pub fn primary_team(&self) -> Option<i64> {
        self.teams.first().copied()
    }

    /// Every scheduled date, ascending
    pub fn scheduled_dates(&self) -> Vec<NaiveDate> {
        self.work_schedule
            .iter()
            .flat_map(|e| e.dates.iter().copied())
            .collect()
    }
}

/// Create team member payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMemberCreate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Parsed case-insensitively
    pub position: Option<String>,
    #[serde(default)]
    pub teams: Vec<i64>,
}

/// Update team member payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMemberUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
}
