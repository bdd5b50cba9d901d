#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{DailyTotal, DailyTotalCreate, Team, TeamCreate, TeamMember, TeamMemberCreate};
use tip_server::db::RecordStore;
use tip_server::{Config, ServerState, TipStorage};

pub fn config() -> Config {
    let mut config = Config::with_overrides("./target/tip-test", 0);
    config.cohort_lock_timeout_ms = 100;
    config
}

pub fn state() -> ServerState {
    let store = TipStorage::open_in_memory().expect("in-memory store");
    ServerState::with_store(config(), Arc::new(store))
}

pub fn state_with(store: Arc<dyn RecordStore>) -> ServerState {
    ServerState::with_store(config(), store)
}

pub fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

pub fn sales(date: NaiveDate, food: f64, bar: f64, non_cash: f64, cash: f64) -> DailyTotalCreate {
    DailyTotalCreate {
        date: Some(date.to_string()),
        food_sales: Some(food),
        bar_sales: Some(bar),
        non_cash_tips: Some(non_cash),
        cash_tips: Some(cash),
    }
}

pub async fn team(state: &ServerState, name: &str) -> Team {
    state
        .roster
        .create_team(TeamCreate {
            name: Some(name.to_string()),
        })
        .await
        .unwrap()
}

pub async fn member(state: &ServerState, first: &str, position: &str, teams: &[i64]) -> TeamMember {
    state
        .roster
        .create_team_member(TeamMemberCreate {
            first_name: Some(first.to_string()),
            last_name: Some("Test".to_string()),
            position: Some(position.to_string()),
            teams: teams.to_vec(),
        })
        .await
        .unwrap()
}

/// Submit a daily total with no guest tips
pub async fn submit(state: &ServerState, member_id: i64, date: NaiveDate, food: f64, bar: f64) -> DailyTotal {
    state
        .coordinator
        .submit_daily_total(member_id, sales(date, food, bar, 0.0, 0.0))
        .await
        .unwrap()
}

/// The member's stored record on `date`
pub fn on(state: &ServerState, member_id: i64, date: NaiveDate) -> DailyTotal {
    state
        .ledger
        .list_daily_totals(member_id)
        .unwrap()
        .into_iter()
        .find(|dt| dt.date == date)
        .expect("daily total on date")
}
