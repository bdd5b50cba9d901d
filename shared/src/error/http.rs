//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::TeamNotFound
            | Self::TeamMemberNotFound
            | Self::DailyTotalNotFound
            | Self::WeeklyTotalNotFound
            | Self::ScheduleDateNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::TeamNameExists
            | Self::DailyTotalExists
            | Self::ScheduleDateExists
            | Self::RevisionConflict => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::CohortBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::PartialCommit
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::UnknownPosition => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            ErrorCode::TeamMemberNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::DailyTotalNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::DailyTotalExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::ScheduleDateExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::RevisionConflict.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::RequiredField.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::UnknownPosition.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::CohortBusy.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::PartialCommit.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::ConfigError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
