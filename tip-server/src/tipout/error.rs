//! Tip ledger errors
//!
//! | Variant | ErrorCode | HTTP |
//! |---------|-----------|------|
//! | Validation | ValidationFailed / RequiredField / InvalidFormat / UnknownPosition | 400 |
//! | Duplicate | DailyTotalExists / ScheduleDateExists / TeamNameExists | 409 |
//! | NotFound | TeamNotFound / TeamMemberNotFound / DailyTotalNotFound / ScheduleDateNotFound | 404 |
//! | Contention | CohortBusy | 503 |
//! | Conflict | RevisionConflict | 409 |
//! | PartialCommit | PartialCommit | 500 |
//! | Store | DatabaseError | 500 |

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::StoreError;
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum TipError {
    #[error("{0}")]
    Validation(AppError),

    #[error("{0}")]
    Duplicate(AppError),

    #[error("{0}")]
    NotFound(AppError),

    /// Another request holds the cohort lock; nothing was written
    #[error("Team {team_id} on {date} is being settled by another request")]
    Contention { team_id: i64, date: NaiveDate },

    /// A member changed between read and write; nothing was written
    #[error("Team member {0} was modified concurrently")]
    Conflict(i64),

    /// The member mutation is durable but the cohort was not resettled
    #[error("Record {record_id} saved but tip-outs were not recomputed: {source}")]
    PartialCommit {
        record_id: i64,
        #[source]
        source: Box<TipError>,
    },

    #[error(transparent)]
    Store(StoreError),
}

pub type TipResult<T> = Result<T, TipError>;

impl TipError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(AppError::validation(msg))
    }

    pub fn required(field: &str) -> Self {
        Self::Validation(AppError::required_field(field))
    }

    pub fn invalid_date(value: &str) -> Self {
        Self::Validation(
            AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid date format: {} (expected YYYY-MM-DD)", value),
            )
            .with_detail("value", value),
        )
    }

    pub fn unknown_position(value: &str) -> Self {
        Self::Validation(
            AppError::with_message(
                ErrorCode::UnknownPosition,
                format!(
                    "Unknown position '{}', expected one of server, bartender, runner, host",
                    value
                ),
            )
            .with_detail("position", value),
        )
    }

    pub fn team_not_found(id: i64) -> Self {
        Self::NotFound(
            AppError::with_message(ErrorCode::TeamNotFound, format!("Team {} not found", id))
                .with_detail("team_id", id),
        )
    }

    pub fn member_not_found(id: i64) -> Self {
        Self::NotFound(
            AppError::with_message(
                ErrorCode::TeamMemberNotFound,
                format!("Team member {} not found", id),
            )
            .with_detail("team_member_id", id),
        )
    }

    pub fn daily_total_not_found(id: i64) -> Self {
        Self::NotFound(
            AppError::with_message(
                ErrorCode::DailyTotalNotFound,
                format!("Daily total {} not found", id),
            )
            .with_detail("daily_total_id", id),
        )
    }

    pub fn weekly_total_not_found(date: NaiveDate) -> Self {
        Self::NotFound(
            AppError::with_message(
                ErrorCode::WeeklyTotalNotFound,
                format!("No weekly total for the week of {}", date),
            )
            .with_detail("date", date.to_string()),
        )
    }

    pub fn schedule_date_not_found(date: NaiveDate) -> Self {
        Self::NotFound(
            AppError::with_message(
                ErrorCode::ScheduleDateNotFound,
                format!("{} is not in the work schedule", date),
            )
            .with_detail("date", date.to_string()),
        )
    }

    pub fn schedule_month_not_found(year: i32, month: u32) -> Self {
        Self::NotFound(
            AppError::with_message(
                ErrorCode::ScheduleDateNotFound,
                format!("No work schedule for {}-{:02}", year, month),
            )
            .with_detail("year", year)
            .with_detail("month", month),
        )
    }

    pub fn not_on_team(member_id: i64, team_id: i64) -> Self {
        Self::NotFound(
            AppError::with_message(
                ErrorCode::TeamMemberNotFound,
                format!("Team member {} is not on team {}", member_id, team_id),
            )
            .with_detail("team_member_id", member_id)
            .with_detail("team_id", team_id),
        )
    }

    pub fn daily_total_exists(date: NaiveDate) -> Self {
        Self::Duplicate(
            AppError::with_message(
                ErrorCode::DailyTotalExists,
                format!("A daily total already exists for {}", date),
            )
            .with_detail("date", date.to_string()),
        )
    }

    pub fn schedule_date_exists(date: NaiveDate) -> Self {
        Self::Duplicate(
            AppError::with_message(
                ErrorCode::ScheduleDateExists,
                format!("{} is already in the work schedule", date),
            )
            .with_detail("date", date.to_string()),
        )
    }

    pub fn team_name_exists(name: &str) -> Self {
        Self::Duplicate(
            AppError::with_message(
                ErrorCode::TeamNameExists,
                format!("A team named '{}' already exists", name),
            )
            .with_detail("name", name),
        )
    }

    /// Wrap a failure that happened after `record_id` was committed
    pub fn partial(record_id: i64, source: TipError) -> Self {
        Self::PartialCommit {
            record_id,
            source: Box::new(source),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(e) | Self::Duplicate(e) | Self::NotFound(e) => e.code,
            Self::Contention { .. } => ErrorCode::CohortBusy,
            Self::Conflict(_) => ErrorCode::RevisionConflict,
            Self::PartialCommit { .. } => ErrorCode::PartialCommit,
            Self::Store(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<StoreError> for TipError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { id, .. } => Self::Conflict(id),
            other => Self::Store(other),
        }
    }
}

/// Validation helpers in `utils` report through `AppError`
impl From<AppError> for TipError {
    fn from(err: AppError) -> Self {
        Self::Validation(err)
    }
}

impl From<TipError> for AppError {
    fn from(err: TipError) -> Self {
        match err {
            TipError::Validation(e) | TipError::Duplicate(e) | TipError::NotFound(e) => e,
            TipError::Contention { team_id, date } => AppError::new(ErrorCode::CohortBusy)
                .with_detail("team_id", team_id)
                .with_detail("date", date.to_string())
                .with_detail("retryable", true),
            TipError::Conflict(id) => AppError::new(ErrorCode::RevisionConflict)
                .with_detail("team_member_id", id)
                .with_detail("retryable", true),
            TipError::PartialCommit { record_id, source } => AppError::with_message(
                ErrorCode::PartialCommit,
                format!("Record saved but tip-outs may be stale: {}", source),
            )
            .with_detail("record_id", record_id)
            .with_detail("retryable", true),
            TipError::Store(e) => AppError::database(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for TipError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err: TipError = StoreError::Conflict {
            id: 7,
            expected: 1,
            found: 2,
        }
        .into();
        assert!(matches!(err, TipError::Conflict(7)));
        assert_eq!(err.code(), ErrorCode::RevisionConflict);
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = TipError::daily_total_exists(date()).into();
        assert_eq!(app.code, ErrorCode::DailyTotalExists);
        assert_eq!(app.http_status(), StatusCode::CONFLICT);

        let app: AppError = TipError::member_not_found(3).into();
        assert_eq!(app.http_status(), StatusCode::NOT_FOUND);

        let app: AppError = TipError::Contention {
            team_id: 1,
            date: date(),
        }
        .into();
        assert_eq!(app.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(app.code.is_retryable());
    }

    #[test]
    fn test_partial_commit_carries_record_id() {
        let err = TipError::partial(42, TipError::Conflict(9));
        assert_eq!(err.code(), ErrorCode::PartialCommit);
        let app: AppError = err.into();
        assert_eq!(app.details.unwrap()["record_id"], 42);
    }

    #[test]
    fn test_unknown_position_is_bad_request() {
        let app: AppError = TipError::unknown_position("busser").into();
        assert_eq!(app.code, ErrorCode::UnknownPosition);
        assert_eq!(app.http_status(), StatusCode::BAD_REQUEST);
    }
}
