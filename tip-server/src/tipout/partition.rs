//! Position partitioner
//!
//! Splits a cohort into per-position buckets. Buckets hold indices into the
//! cohort slice so the allocator can write results back in cohort order.

use std::collections::BTreeMap;

use shared::models::{DailyTotal, Position};

/// One member's record within a (team, date) cohort
#[derive(Debug, Clone, PartialEq)]
pub struct CohortEntry {
    pub member_id: i64,
    pub position: Position,
    pub daily_total: DailyTotal,
}

#[derive(Debug, Clone, Default)]
pub struct Partition {
    buckets: BTreeMap<Position, Vec<usize>>,
}

impl Partition {
    pub fn of(entries: &[CohortEntry]) -> Self {
        let mut buckets: BTreeMap<Position, Vec<usize>> = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            buckets.entry(entry.position).or_default().push(idx);
        }
        Self { buckets }
    }

    /// Indices of the entries holding `position`
    pub fn members(&self, position: Position) -> &[usize] {
        self.buckets
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, position: Position) -> usize {
        self.members(position).len()
    }

    pub fn is_present(&self, position: Position) -> bool {
        self.count(position) > 0
    }

    /// Count for every position, zero included
    pub fn counts(&self) -> BTreeMap<Position, usize> {
        Position::ALL.iter().map(|p| (*p, self.count(*p))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::SalesFigures;

    fn entry(member_id: i64, position: Position) -> CohortEntry {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        CohortEntry {
            member_id,
            position,
            daily_total: DailyTotal::new(member_id * 10, member_id, date, SalesFigures::default(), 0),
        }
    }

    #[test]
    fn test_partition_groups_by_position() {
        let entries = vec![
            entry(1, Position::Server),
            entry(2, Position::Bartender),
            entry(3, Position::Server),
            entry(4, Position::Host),
        ];
        let partition = Partition::of(&entries);

        assert_eq!(partition.members(Position::Server), &[0, 2]);
        assert_eq!(partition.members(Position::Bartender), &[1]);
        assert_eq!(partition.count(Position::Runner), 0);
        assert!(!partition.is_present(Position::Runner));
        assert!(partition.is_present(Position::Host));
    }

    #[test]
    fn test_counts_include_empty_positions() {
        let partition = Partition::of(&[]);
        let counts = partition.counts();
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|c| *c == 0));
    }
}
