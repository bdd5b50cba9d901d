//! Daily Total Model
//!
//! One record per team member per calendar day. Sales and guest tips are
//! entered by the member; every other field is derived by the tip-out
//! allocator and must not be set by clients.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// What a server would owe each recipient position if that position worked
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PotentialTipOuts {
    pub host: f64,
    pub runner: f64,
    pub bartender: f64,
}

/// Per member, per date sales and tip aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub id: i64,
    pub team_member_id: i64,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,

    // ---- entered ----
    pub food_sales: f64,
    pub bar_sales: f64,
    pub non_cash_tips: f64,
    pub cash_tips: f64,

    // ---- derived ----
    /// Present only when the owner is a server
    #[serde(default)]
    pub potential_tip_outs: Option<PotentialTipOuts>,
    #[serde(default)]
    pub bar_tip_outs: f64,
    #[serde(default)]
    pub runner_tip_outs: f64,
    #[serde(default)]
    pub host_tip_outs: f64,
    #[serde(default)]
    pub total_tip_out: f64,
    #[serde(default)]
    pub guest_tips_received: f64,
    /// Pooled share received from the servers of the cohort
    #[serde(default)]
    pub server_tips_received: f64,
    #[serde(default)]
    pub tips_received: f64,
    #[serde(default)]
    pub total_payroll_tips: f64,

    pub created_at: i64,
    pub updated_at: i64,
}

impl DailyTotal {
    /// New record with only the entered fields set; derived fields are zero
    /// until recomputed.
    pub fn new(
        id: i64,
        team_member_id: i64,
        date: NaiveDate,
        sales: SalesFigures,
        now: i64,
    ) -> Self {
        Self {
            id,
            team_member_id,
            date,
            year: date.year(),
            month: date.month(),
            food_sales: sales.food_sales,
            bar_sales: sales.bar_sales,
            non_cash_tips: sales.non_cash_tips,
            cash_tips: sales.cash_tips,
            potential_tip_outs: None,
            bar_tip_outs: 0.0,
            runner_tip_outs: 0.0,
            host_tip_outs: 0.0,
            total_tip_out: 0.0,
            guest_tips_received: 0.0,
            server_tips_received: 0.0,
            tips_received: 0.0,
            total_payroll_tips: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the record to another date, keeping year/month in sync
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.year = date.year();
        self.month = date.month();
    }
}

/// Validated sales input of a daily total
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalesFigures {
    pub food_sales: f64,
    pub bar_sales: f64,
    pub non_cash_tips: f64,
    pub cash_tips: f64,
}

/// Submit daily total payload
///
/// Every field is optional on the wire so missing values can be reported
/// as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyTotalCreate {
    /// ISO-8601 calendar date (YYYY-MM-DD)
    pub date: Option<String>,
    pub food_sales: Option<f64>,
    pub bar_sales: Option<f64>,
    pub non_cash_tips: Option<f64>,
    pub cash_tips: Option<f64>,
}

/// Update daily total payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyTotalUpdate {
    pub date: Option<String>,
    pub food_sales: Option<f64>,
    pub bar_sales: Option<f64>,
    pub non_cash_tips: Option<f64>,
    pub cash_tips: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_year_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let dt = DailyTotal::new(1, 2, date, SalesFigures::default(), 0);
        assert_eq!(dt.year, 2024);
        assert_eq!(dt.month, 1);
        assert!(dt.potential_tip_outs.is_none());
    }

    #[test]
    fn test_set_date_updates_year_month() {
        let mut dt = DailyTotal::new(
            1,
            2,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            SalesFigures::default(),
            0,
        );
        dt.set_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(dt.month, 2);
        assert_eq!(dt.date.to_string(), "2024-02-01");
    }

    #[test]
    fn test_serialize_snake_case_iso_date() {
        let dt = DailyTotal::new(
            7,
            3,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            SalesFigures {
                food_sales: 1000.0,
                bar_sales: 500.0,
                non_cash_tips: 150.0,
                cash_tips: 50.0,
            },
            0,
        );
        let json = serde_json::to_value(&dt).unwrap();
        assert_eq!(json["date"], "2024-01-10");
        assert_eq!(json["team_member_id"], 3);
        assert_eq!(json["food_sales"], 1000.0);
        assert!(json["potential_tip_outs"].is_null());
    }
}
