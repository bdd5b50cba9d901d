//! Weekly rollup
//!
//! A member's weekly total is the sum of their daily totals over a
//! Monday-start week. It is rebuilt whenever a daily total in that week
//! changes and dropped when the week has no daily totals left.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{DailyTotal, TeamMember, WeeklyTotal};

use super::money::{to_decimal, to_f64};
use crate::utils::time::{week_end, week_start};

#[derive(Default)]
struct Sums {
    food_sales: Decimal,
    bar_sales: Decimal,
    non_cash_tips: Decimal,
    cash_tips: Decimal,
    bar_tip_outs: Decimal,
    runner_tip_outs: Decimal,
    host_tip_outs: Decimal,
    total_tip_out: Decimal,
    guest_tips_received: Decimal,
    server_tips_received: Decimal,
    tips_received: Decimal,
    total_payroll_tips: Decimal,
}

impl Sums {
    fn add(&mut self, dt: &DailyTotal) {
        self.food_sales += to_decimal(dt.food_sales);
        self.bar_sales += to_decimal(dt.bar_sales);
        self.non_cash_tips += to_decimal(dt.non_cash_tips);
        self.cash_tips += to_decimal(dt.cash_tips);
        self.bar_tip_outs += to_decimal(dt.bar_tip_outs);
        self.runner_tip_outs += to_decimal(dt.runner_tip_outs);
        self.host_tip_outs += to_decimal(dt.host_tip_outs);
        self.total_tip_out += to_decimal(dt.total_tip_out);
        self.guest_tips_received += to_decimal(dt.guest_tips_received);
        self.server_tips_received += to_decimal(dt.server_tips_received);
        self.tips_received += to_decimal(dt.tips_received);
        self.total_payroll_tips += to_decimal(dt.total_payroll_tips);
    }
}

/// Sum the daily totals that fall in the week containing `date`
pub fn rollup_week(daily_totals: &[DailyTotal], date: NaiveDate) -> Option<WeeklyTotal> {
    let start = week_start(date);
    let end = week_end(date);

    let mut sums = Sums::default();
    let mut day_count = 0u32;
    for dt in daily_totals.iter().filter(|dt| start <= dt.date && dt.date <= end) {
        sums.add(dt);
        day_count += 1;
    }
    if day_count == 0 {
        return None;
    }

    Some(WeeklyTotal {
        week_start: start,
        week_end: end,
        food_sales: to_f64(sums.food_sales),
        bar_sales: to_f64(sums.bar_sales),
        non_cash_tips: to_f64(sums.non_cash_tips),
        cash_tips: to_f64(sums.cash_tips),
        bar_tip_outs: to_f64(sums.bar_tip_outs),
        runner_tip_outs: to_f64(sums.runner_tip_outs),
        host_tip_outs: to_f64(sums.host_tip_outs),
        total_tip_out: to_f64(sums.total_tip_out),
        guest_tips_received: to_f64(sums.guest_tips_received),
        server_tips_received: to_f64(sums.server_tips_received),
        tips_received: to_f64(sums.tips_received),
        total_payroll_tips: to_f64(sums.total_payroll_tips),
        day_count,
    })
}

/// Rebuild the member's weekly total for the week containing `date`
pub fn refresh_week(member: &mut TeamMember, date: NaiveDate) {
    let start = week_start(date);
    member.weekly_totals.retain(|w| w.week_start != start);
    if let Some(weekly) = rollup_week(&member.daily_totals, date) {
        let pos = member
            .weekly_totals
            .partition_point(|w| w.week_start < weekly.week_start);
        member.weekly_totals.insert(pos, weekly);
    }
}

/// Rebuild the weeks of several dates (duplicates are cheap)
pub fn refresh_weeks(member: &mut TeamMember, dates: impl IntoIterator<Item = NaiveDate>) {
    let mut starts: Vec<NaiveDate> = dates.into_iter().map(week_start).collect();
    starts.sort();
    starts.dedup();
    for start in starts {
        refresh_week(member, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tipout::record;
    use shared::models::{Position, SalesFigures};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn member_with(dates: &[NaiveDate]) -> TeamMember {
        let mut member = TeamMember {
            id: 1,
            first_name: "A".into(),
            last_name: "B".into(),
            position: Position::Server,
            teams: vec![],
            daily_totals: vec![],
            weekly_totals: vec![],
            work_schedule: vec![],
            revision: 0,
            created_at: 0,
            updated_at: 0,
        };
        for (i, date) in dates.iter().enumerate() {
            let sales = SalesFigures {
                food_sales: 100.0,
                bar_sales: 10.0,
                non_cash_tips: 20.0,
                cash_tips: 5.5,
            };
            let dt = record::build(i as i64, &member, *date, sales, 0);
            record::insert_sorted(&mut member, dt);
        }
        member
    }

    #[test]
    fn test_rollup_sums_week_only() {
        // Mon 8th, Sun 14th in one week; Mon 15th in the next
        let member = member_with(&[d(1, 8), d(1, 14), d(1, 15)]);
        let week = rollup_week(&member.daily_totals, d(1, 10)).unwrap();
        assert_eq!(week.week_start, d(1, 8));
        assert_eq!(week.week_end, d(1, 14));
        assert_eq!(week.day_count, 2);
        assert_eq!(week.food_sales, 200.0);
        assert_eq!(week.cash_tips, 11.0);
        assert_eq!(week.guest_tips_received, 51.0);
    }

    #[test]
    fn test_empty_week_is_none() {
        let member = member_with(&[d(1, 8)]);
        assert!(rollup_week(&member.daily_totals, d(1, 22)).is_none());
    }

    #[test]
    fn test_refresh_week_replaces_and_removes() {
        let mut member = member_with(&[d(1, 8), d(1, 15)]);
        refresh_weeks(&mut member, [d(1, 8), d(1, 15)]);
        assert_eq!(member.weekly_totals.len(), 2);
        assert_eq!(member.weekly_totals[0].week_start, d(1, 8));

        member.daily_totals.retain(|dt| dt.date != d(1, 8));
        refresh_week(&mut member, d(1, 8));
        assert_eq!(member.weekly_totals.len(), 1);
        assert_eq!(member.weekly_totals[0].week_start, d(1, 15));
    }
}
