//! Work schedule operations on a single member
//!
//! Schedule entries are grouped by (year, month) and kept sorted; dates
//! within an entry are sorted and unique. An entry whose last date is
//! removed is deleted.

use chrono::{Datelike, NaiveDate};
use shared::models::{TeamMember, WorkScheduleEntry};

use crate::tipout::{TipError, TipResult};

/// Insert `date`; returns false if it was already scheduled
pub fn insert_date(member: &mut TeamMember, date: NaiveDate) -> bool {
    let (year, month) = (date.year(), date.month());
    let idx = match member
        .work_schedule
        .binary_search_by(|e| (e.year, e.month).cmp(&(year, month)))
    {
        Ok(idx) => idx,
        Err(idx) => {
            member.work_schedule.insert(
                idx,
                WorkScheduleEntry {
                    year,
                    month,
                    dates: Vec::new(),
                },
            );
            idx
        }
    };

    let dates = &mut member.work_schedule[idx].dates;
    match dates.binary_search(&date) {
        Ok(_) => false,
        Err(pos) => {
            dates.insert(pos, date);
            true
        }
    }
}

/// Add a date, failing if it is already scheduled
pub fn add_date(member: &mut TeamMember, date: NaiveDate) -> TipResult<()> {
    if member.is_scheduled_on(date) {
        return Err(TipError::schedule_date_exists(date));
    }
    insert_date(member, date);
    Ok(())
}

/// Remove a date; returns false if it was not scheduled
pub fn take_date(member: &mut TeamMember, date: NaiveDate) -> bool {
    let Some(idx) = member
        .work_schedule
        .iter()
        .position(|e| e.year == date.year() && e.month == date.month())
    else {
        return false;
    };

    let entry = &mut member.work_schedule[idx];
    let before = entry.dates.len();
    entry.dates.retain(|d| *d != date);
    let removed = entry.dates.len() != before;
    if entry.dates.is_empty() {
        member.work_schedule.remove(idx);
    }
    removed
}

/// Remove a date, failing if it is not scheduled
pub fn remove_date(member: &mut TeamMember, date: NaiveDate) -> TipResult<()> {
    if !take_date(member, date) {
        return Err(TipError::schedule_date_not_found(date));
    }
    Ok(())
}

/// Remove a whole month, returning the dates it held
pub fn remove_month(member: &mut TeamMember, year: i32, month: u32) -> Vec<NaiveDate> {
    match member
        .work_schedule
        .iter()
        .position(|e| e.year == year && e.month == month)
    {
        Some(idx) => member.work_schedule.remove(idx).dates,
        None => Vec::new(),
    }
}

pub fn month(member: &TeamMember, year: i32, month: u32) -> Option<&WorkScheduleEntry> {
    member
        .work_schedule
        .iter()
        .find(|e| e.year == year && e.month == month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Position;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn member() -> TeamMember {
        TeamMember {
            id: 1,
            first_name: "A".into(),
            last_name: "B".into(),
            position: Position::Runner,
            teams: vec![],
            daily_totals: vec![],
            weekly_totals: vec![],
            work_schedule: vec![],
            revision: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_insert_keeps_entries_and_dates_sorted() {
        let mut m = member();
        assert!(insert_date(&mut m, d(2, 3)));
        assert!(insert_date(&mut m, d(1, 20)));
        assert!(insert_date(&mut m, d(1, 5)));
        assert!(!insert_date(&mut m, d(1, 5)));

        assert_eq!(m.work_schedule.len(), 2);
        assert_eq!((m.work_schedule[0].year, m.work_schedule[0].month), (2024, 1));
        assert_eq!(m.work_schedule[0].dates, vec![d(1, 5), d(1, 20)]);
        assert_eq!(m.scheduled_dates(), vec![d(1, 5), d(1, 20), d(2, 3)]);
    }

    #[test]
    fn test_add_existing_date_is_duplicate() {
        let mut m = member();
        add_date(&mut m, d(1, 10)).unwrap();
        let err = add_date(&mut m, d(1, 10)).unwrap_err();
        assert!(matches!(err, TipError::Duplicate(_)));
    }

    #[test]
    fn test_remove_last_date_deletes_entry() {
        let mut m = member();
        add_date(&mut m, d(1, 10)).unwrap();
        add_date(&mut m, d(2, 1)).unwrap();

        remove_date(&mut m, d(1, 10)).unwrap();
        assert!(month(&m, 2024, 1).is_none());
        assert_eq!(m.work_schedule.len(), 1);

        let err = remove_date(&mut m, d(1, 10)).unwrap_err();
        assert!(matches!(err, TipError::NotFound(_)));
    }

    #[test]
    fn test_remove_month() {
        let mut m = member();
        add_date(&mut m, d(1, 10)).unwrap();
        add_date(&mut m, d(1, 11)).unwrap();
        add_date(&mut m, d(2, 1)).unwrap();

        assert_eq!(remove_month(&mut m, 2024, 1), vec![d(1, 10), d(1, 11)]);
        assert!(remove_month(&mut m, 2024, 1).is_empty());
        assert_eq!(m.scheduled_dates(), vec![d(2, 1)]);
    }
}
