//! Work Schedule Model

use super::Position;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dates worked within one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkScheduleEntry {
    pub year: i32,
    pub month: u32,
    /// Sorted, unique
    pub dates: Vec<NaiveDate>,
}

/// Add / remove schedule date payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDateRequest {
    /// ISO-8601 calendar date (YYYY-MM-DD)
    pub date: Option<String>,
}

/// One member's schedule as listed for a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSchedule {
    pub team_member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    pub work_schedule: Vec<WorkScheduleEntry>,
}
