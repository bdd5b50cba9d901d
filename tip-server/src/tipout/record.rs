//! Daily total record logic
//!
//! Validation of submitted sales, potential tip-outs for servers, and the
//! derived totals. Derived fields are never computed implicitly: callers
//! invoke [`recompute_derived`] after every change to tip-outs or received
//! tips.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{
    DailyTotal, DailyTotalCreate, DailyTotalUpdate, PotentialTipOuts, Position, SalesFigures,
    TeamMember,
};

use super::error::{TipError, TipResult};
use super::money::{to_decimal, to_f64};
use super::rates;
use crate::utils::validation::validate_amount;

/// Parse an ISO-8601 calendar date, reporting a validation error
pub fn parse_date_field(value: Option<&str>) -> TipResult<NaiveDate> {
    let raw = value.ok_or_else(|| TipError::required("date"))?;
    if raw.trim().is_empty() {
        return Err(TipError::required("date"));
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| TipError::invalid_date(raw))
}

fn required_amount(value: Option<f64>, field: &str) -> TipResult<f64> {
    let v = value.ok_or_else(|| TipError::required(field))?;
    validate_amount(v, field)?;
    Ok(v)
}

/// Validate a submission independent of who submits it
pub fn validate_submission(payload: &DailyTotalCreate) -> TipResult<(NaiveDate, SalesFigures)> {
    let date = parse_date_field(payload.date.as_deref())?;
    let sales = SalesFigures {
        food_sales: required_amount(payload.food_sales, "food_sales")?,
        bar_sales: required_amount(payload.bar_sales, "bar_sales")?,
        non_cash_tips: required_amount(payload.non_cash_tips, "non_cash_tips")?,
        cash_tips: required_amount(payload.cash_tips, "cash_tips")?,
    };
    Ok((date, sales))
}

/// At most one daily total per (member, date)
pub fn ensure_unique(member: &TeamMember, date: NaiveDate) -> TipResult<()> {
    if member.daily_total_on(date).is_some() {
        return Err(TipError::daily_total_exists(date));
    }
    Ok(())
}

/// Validate a partial update; returns the new date if it changes
pub fn validate_update(payload: &DailyTotalUpdate) -> TipResult<Option<NaiveDate>> {
    let date = match payload.date.as_deref() {
        Some(raw) => Some(parse_date_field(Some(raw))?),
        None => None,
    };
    for (value, field) in [
        (payload.food_sales, "food_sales"),
        (payload.bar_sales, "bar_sales"),
        (payload.non_cash_tips, "non_cash_tips"),
        (payload.cash_tips, "cash_tips"),
    ] {
        if let Some(v) = value {
            validate_amount(v, field)?;
        }
    }
    Ok(date)
}

/// Apply the sales fields of a validated update
pub fn apply_update(dt: &mut DailyTotal, payload: &DailyTotalUpdate) {
    if let Some(v) = payload.food_sales {
        dt.food_sales = v;
    }
    if let Some(v) = payload.bar_sales {
        dt.bar_sales = v;
    }
    if let Some(v) = payload.non_cash_tips {
        dt.non_cash_tips = v;
    }
    if let Some(v) = payload.cash_tips {
        dt.cash_tips = v;
    }
}

/// What a server with these sales would owe each position; `None` for
/// every other position.
pub fn compute_potential_tip_outs(position: Position, dt: &DailyTotal) -> Option<PotentialTipOuts> {
    if !position.is_server() {
        return None;
    }
    let food = to_decimal(dt.food_sales);
    let bar = to_decimal(dt.bar_sales);
    Some(PotentialTipOuts {
        host: to_f64(rates::tip_out(Position::Host, food, bar)),
        runner: to_f64(rates::tip_out(Position::Runner, food, bar)),
        bartender: to_f64(rates::tip_out(Position::Bartender, food, bar)),
    })
}

/// Potential tip-out owed to one recipient position
pub fn potential_for(potential: &PotentialTipOuts, position: Position) -> f64 {
    match position {
        Position::Host => potential.host,
        Position::Runner => potential.runner,
        Position::Bartender => potential.bartender,
        Position::Server => 0.0,
    }
}

/// Recompute totals from tip-out and received-tip fields
pub fn recompute_derived(dt: &mut DailyTotal) {
    let bar = to_decimal(dt.bar_tip_outs);
    let runner = to_decimal(dt.runner_tip_outs);
    let host = to_decimal(dt.host_tip_outs);
    let total_tip_out = bar + runner + host;

    let guest = to_decimal(dt.non_cash_tips) + to_decimal(dt.cash_tips);
    let tips_received = guest + to_decimal(dt.server_tips_received);

    dt.total_tip_out = to_f64(total_tip_out);
    dt.guest_tips_received = to_f64(guest);
    dt.tips_received = to_f64(tips_received);
    dt.total_payroll_tips = to_f64(tips_received - total_tip_out);
}

/// Refresh potential tip-outs for the owner's position, then derived fields
pub fn refresh(dt: &mut DailyTotal, position: Position) {
    dt.potential_tip_outs = compute_potential_tip_outs(position, dt);
    recompute_derived(dt);
}

/// Reset pooled fields of a record that is in no cohort
///
/// The record keeps its own sales and guest tips but neither pays nor
/// receives tip-outs.
pub fn detach(dt: &mut DailyTotal) {
    dt.bar_tip_outs = 0.0;
    dt.runner_tip_outs = 0.0;
    dt.host_tip_outs = 0.0;
    dt.server_tips_received = 0.0;
    recompute_derived(dt);
}

/// Set a server's actual tip-outs (already rounded amounts)
pub fn set_tip_outs(dt: &mut DailyTotal, bartender: Decimal, runner: Decimal, host: Decimal) {
    dt.bar_tip_outs = to_f64(bartender);
    dt.runner_tip_outs = to_f64(runner);
    dt.host_tip_outs = to_f64(host);
}

/// Create a fully derived record for `member`
pub fn build(
    id: i64,
    member: &TeamMember,
    date: NaiveDate,
    sales: SalesFigures,
    now: i64,
) -> DailyTotal {
    let mut dt = DailyTotal::new(id, member.id, date, sales, now);
    refresh(&mut dt, member.position);
    dt
}

/// Insert keeping `daily_totals` sorted by date
pub fn insert_sorted(member: &mut TeamMember, dt: DailyTotal) {
    let pos = member
        .daily_totals
        .partition_point(|existing| existing.date < dt.date);
    member.daily_totals.insert(pos, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tipout::money::money_eq;
    use shared::error::ErrorCode;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn sales(food: f64, bar: f64, non_cash: f64, cash: f64) -> SalesFigures {
        SalesFigures {
            food_sales: food,
            bar_sales: bar,
            non_cash_tips: non_cash,
            cash_tips: cash,
        }
    }

    fn payload() -> DailyTotalCreate {
        DailyTotalCreate {
            date: Some("2024-01-10".into()),
            food_sales: Some(1000.0),
            bar_sales: Some(500.0),
            non_cash_tips: Some(180.0),
            cash_tips: Some(20.0),
        }
    }

    fn code_of(err: TipError) -> ErrorCode {
        err.code()
    }

    #[test]
    fn test_validate_submission_ok() {
        let (d, s) = validate_submission(&payload()).unwrap();
        assert_eq!(d, date());
        assert_eq!(s, sales(1000.0, 500.0, 180.0, 20.0));
    }

    #[test]
    fn test_validate_submission_missing_fields() {
        let mut p = payload();
        p.cash_tips = None;
        let err = validate_submission(&p).unwrap_err();
        assert!(matches!(err, TipError::Validation(_)));
        assert_eq!(code_of(err), ErrorCode::RequiredField);

        let mut p = payload();
        p.date = None;
        assert_eq!(
            code_of(validate_submission(&p).unwrap_err()),
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn test_validate_submission_bad_date_and_amounts() {
        let mut p = payload();
        p.date = Some("2024-02-30".into());
        assert_eq!(
            code_of(validate_submission(&p).unwrap_err()),
            ErrorCode::InvalidFormat
        );

        let mut p = payload();
        p.food_sales = Some(-1.0);
        assert_eq!(
            code_of(validate_submission(&p).unwrap_err()),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_potential_tip_outs_server_only() {
        let dt = DailyTotal::new(1, 1, date(), sales(1000.0, 500.0, 0.0, 0.0), 0);
        let p = compute_potential_tip_outs(Position::Server, &dt).unwrap();
        assert_eq!(p.host, 15.0);
        assert_eq!(p.runner, 40.0);
        assert_eq!(p.bartender, 25.0);

        for position in Position::RECIPIENTS {
            assert!(compute_potential_tip_outs(position, &dt).is_none());
        }
    }

    #[test]
    fn test_potential_tip_outs_rounding() {
        let dt = DailyTotal::new(1, 1, date(), sales(333.33, 0.1, 0.0, 0.0), 0);
        let p = compute_potential_tip_outs(Position::Server, &dt).unwrap();
        // 333.33 × 1.5% = 4.99995 → 5.00
        assert_eq!(p.host, 5.0);
        // 333.33 × 4% = 13.3332 → 13.33
        assert_eq!(p.runner, 13.33);
        // 0.1 × 5% = 0.005 → 0.01 (half away from zero)
        assert_eq!(p.bartender, 0.01);
    }

    #[test]
    fn test_recompute_derived() {
        let mut dt = DailyTotal::new(1, 1, date(), sales(1000.0, 500.0, 180.0, 20.0), 0);
        dt.bar_tip_outs = 25.0;
        dt.runner_tip_outs = 40.0;
        dt.host_tip_outs = 15.0;
        recompute_derived(&mut dt);

        assert_eq!(dt.total_tip_out, 80.0);
        assert_eq!(dt.guest_tips_received, 200.0);
        assert_eq!(dt.tips_received, 200.0);
        assert_eq!(dt.total_payroll_tips, 120.0);
    }

    #[test]
    fn test_recompute_derived_recipient() {
        let mut dt = DailyTotal::new(1, 1, date(), sales(0.0, 0.0, 10.1, 0.2), 0);
        dt.server_tips_received = 12.5;
        recompute_derived(&mut dt);
        assert!(money_eq(dt.guest_tips_received, 10.3));
        assert!(money_eq(dt.tips_received, 22.8));
        assert!(money_eq(dt.total_payroll_tips, 22.8));
    }

    #[test]
    fn test_detach_clears_pooled_fields() {
        let mut dt = DailyTotal::new(1, 1, date(), sales(1000.0, 500.0, 50.0, 0.0), 0);
        dt.bar_tip_outs = 25.0;
        dt.server_tips_received = 7.0;
        recompute_derived(&mut dt);
        detach(&mut dt);
        assert_eq!(dt.total_tip_out, 0.0);
        assert_eq!(dt.tips_received, 50.0);
        assert_eq!(dt.total_payroll_tips, 50.0);
    }

    #[test]
    fn test_validate_update() {
        let patch = DailyTotalUpdate {
            date: Some("2024-01-11".into()),
            cash_tips: Some(5.0),
            ..Default::default()
        };
        assert_eq!(
            validate_update(&patch).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 11)
        );

        let patch = DailyTotalUpdate {
            bar_sales: Some(f64::NAN),
            ..Default::default()
        };
        assert!(validate_update(&patch).is_err());
    }
}
