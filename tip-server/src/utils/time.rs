//! 日期工具函数
//!
//! Daily totals and schedules are keyed by calendar day only; there is no
//! time-of-day or time zone anywhere in the ledger.

use chrono::{Datelike, Duration, NaiveDate};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 校验月份 (1-12)
pub fn validate_month(month: u32) -> AppResult<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }
    Ok(())
}

/// 所在周的周一 (周一为一周开始)
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// 所在周的周日
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-10").unwrap(), d(2024, 1, 10));
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), d(2024, 2, 29));
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("10/01/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_week_bounds() {
        // 2024-01-10 is a Wednesday
        assert_eq!(week_start(d(2024, 1, 10)), d(2024, 1, 8));
        assert_eq!(week_end(d(2024, 1, 10)), d(2024, 1, 14));
        // Monday and Sunday map to the same week
        assert_eq!(week_start(d(2024, 1, 8)), d(2024, 1, 8));
        assert_eq!(week_start(d(2024, 1, 14)), d(2024, 1, 8));
        // Week spanning a year boundary
        assert_eq!(week_start(d(2025, 1, 1)), d(2024, 12, 30));
        assert_eq!(week_end(d(2025, 1, 1)), d(2025, 1, 5));
    }
}
