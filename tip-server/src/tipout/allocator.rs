//! Tip-out allocator
//!
//! One pure pass over an immutable cohort snapshot:
//!
//! 1. Each server pays its potential tip-out to a recipient position only if
//!    at least one member of that position is in the cohort.
//! 2. Per recipient position, the servers' payments are pooled and split
//!    evenly among that position's members in whole cents. Leftover cents go
//!    one each to the lowest member ids, so the shares always sum to the pool.
//! 3. With no servers every pool is zero.
//!
//! Every field is recomputed from stored sales and potential tip-outs, so
//! running the allocator twice on the same cohort yields the same result.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::{DailyTotal, Position};

use super::money::{round_money, to_decimal, to_f64};
use super::partition::{CohortEntry, Partition};
use super::record::{potential_for, recompute_derived, set_tip_outs};

/// Result of one allocator pass
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Recomputed records, in cohort order
    pub daily_totals: Vec<DailyTotal>,
    /// Pooled amount per recipient position
    pub pools: BTreeMap<Position, Decimal>,
    /// Cohort size per position
    pub counts: BTreeMap<Position, usize>,
}

impl Allocation {
    /// Entries whose record differs from the snapshot
    pub fn changed<'a>(
        &'a self,
        cohort: &'a [CohortEntry],
    ) -> impl Iterator<Item = (&'a CohortEntry, &'a DailyTotal)> + 'a {
        cohort
            .iter()
            .zip(self.daily_totals.iter())
            .filter(|(entry, dt)| entry.daily_total != **dt)
    }
}

pub fn allocate(cohort: &[CohortEntry]) -> Allocation {
    let partition = Partition::of(cohort);
    let mut out: Vec<DailyTotal> = cohort.iter().map(|e| e.daily_total.clone()).collect();
    let mut pools: BTreeMap<Position, Decimal> = Position::RECIPIENTS
        .iter()
        .map(|p| (*p, Decimal::ZERO))
        .collect();

    // 1. Servers pay into the pools of positions that are present
    for &idx in partition.members(Position::Server) {
        let dt = &mut out[idx];
        let mut owed = BTreeMap::new();
        for position in Position::RECIPIENTS {
            let amount = match (&dt.potential_tip_outs, partition.is_present(position)) {
                (Some(potential), true) => round_money(to_decimal(potential_for(potential, position))),
                _ => Decimal::ZERO,
            };
            owed.insert(position, amount);
            *pools.entry(position).or_insert(Decimal::ZERO) += amount;
        }
        if dt.potential_tip_outs.is_none() {
            tracing::warn!(
                member_id = cohort[idx].member_id,
                date = %dt.date,
                "Server daily total has no potential tip-outs, contributing nothing"
            );
        }

        let get = |p: Position| owed.get(&p).copied().unwrap_or(Decimal::ZERO);
        set_tip_outs(
            dt,
            get(Position::Bartender),
            get(Position::Runner),
            get(Position::Host),
        );
        dt.server_tips_received = 0.0;
        recompute_derived(dt);
    }

    // 2. Split each pool evenly among its recipients
    for position in Position::RECIPIENTS {
        let members = partition.members(position);
        if members.is_empty() {
            continue;
        }
        let pool = pools.get(&position).copied().unwrap_or(Decimal::ZERO);
        let shares = split_cents(pool, members.len());

        // Leftover cents go to the lowest member ids first
        let mut ranked = members.to_vec();
        ranked.sort_by_key(|&idx| cohort[idx].member_id);
        for (idx, share) in ranked.into_iter().zip(shares) {
            let dt = &mut out[idx];
            dt.potential_tip_outs = None;
            set_tip_outs(dt, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
            dt.server_tips_received = to_f64(share);
            recompute_derived(dt);
        }
    }

    Allocation {
        daily_totals: out,
        pools,
        counts: partition.counts(),
    }
}

/// Split `pool` into `count` whole-cent shares that sum exactly to the pool.
///
/// Every share is `floor(pool / count)` cents; the remaining cents are handed
/// out one each to the first shares.
fn split_cents(pool: Decimal, count: usize) -> Vec<Decimal> {
    let cents = round_money(pool) * Decimal::ONE_HUNDRED;
    let n = Decimal::from(count);
    let base = (cents / n).floor();
    let leftover = cents - base * n;
    (0..count)
        .map(|rank| {
            let extra = if Decimal::from(rank) < leftover {
                Decimal::ONE
            } else {
                Decimal::ZERO
            };
            (base + extra) / Decimal::ONE_HUNDRED
        })
        .collect()
}
