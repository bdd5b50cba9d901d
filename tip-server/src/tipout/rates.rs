//! Tip-out rate table
//!
//! | Recipient | Rate | Applied to |
//! |-----------|------|------------|
//! | host | 1.5% | server food sales |
//! | runner | 4% | server food sales |
//! | bartender | 5% | server bar sales |
//!
//! Rates are fixed; servers have no rate.

use rust_decimal::Decimal;
use shared::models::Position;

/// 1.5%
pub const HOST_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 3);
/// 4%
pub const RUNNER_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);
/// 5%
pub const BARTENDER_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Which of a server's sales a rate applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesBase {
    Food,
    Bar,
}

/// Rate owed to `position`, zero for servers
pub fn rate(position: Position) -> Decimal {
    match position {
        Position::Host => HOST_RATE,
        Position::Runner => RUNNER_RATE,
        Position::Bartender => BARTENDER_RATE,
        Position::Server => Decimal::ZERO,
    }
}

pub fn sales_base(position: Position) -> Option<SalesBase> {
    match position {
        Position::Host | Position::Runner => Some(SalesBase::Food),
        Position::Bartender => Some(SalesBase::Bar),
        Position::Server => None,
    }
}

/// Amount a server with these sales owes `position`, unrounded
pub fn tip_out(position: Position, food_sales: Decimal, bar_sales: Decimal) -> Decimal {
    match sales_base(position) {
        Some(SalesBase::Food) => food_sales * rate(position),
        Some(SalesBase::Bar) => bar_sales * rate(position),
        None => Decimal::ZERO,
    }
}
