//! Weekly Total Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sum of a member's daily totals over one Monday-start week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTotal {
    /// Monday
    pub week_start: NaiveDate,
    /// Sunday
    pub week_end: NaiveDate,
    pub food_sales: f64,
    pub bar_sales: f64,
    pub non_cash_tips: f64,
    pub cash_tips: f64,
    pub bar_tip_outs: f64,
    pub runner_tip_outs: f64,
    pub host_tip_outs: f64,
    pub total_tip_out: f64,
    pub guest_tips_received: f64,
    pub server_tips_received: f64,
    pub tips_received: f64,
    pub total_payroll_tips: f64,
    /// Number of daily totals in the week
    pub day_count: u32,
}

impl WeeklyTotal {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.week_start <= date && date <= self.week_end
    }
}
