//! Unified error codes for the tip ledger
//!
//! This module defines all error codes used across tip-server and API clients.
//! Error codes are organized by category:
//! - 0xxx: Input errors
//! - 1xxx: Team errors
//! - 2xxx: Team member errors
//! - 3xxx: Daily / weekly total errors
//! - 4xxx: Work schedule errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: Input ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid format (dates, numbers)
    InvalidFormat = 6,
    /// Required field is missing
    RequiredField = 7,

    // ==================== 1xxx: Team ====================
    /// Team not found
    TeamNotFound = 1001,
    /// Team name already exists
    TeamNameExists = 1002,

    // ==================== 2xxx: Team member ====================
    /// Team member not found
    TeamMemberNotFound = 2001,
    /// Position is not one of server/bartender/runner/host
    UnknownPosition = 2002,
    /// Team member was modified concurrently
    RevisionConflict = 2003,

    // ==================== 3xxx: Totals ====================
    /// Daily total not found
    DailyTotalNotFound = 3001,
    /// A daily total already exists for this date
    DailyTotalExists = 3002,
    /// Weekly total not found
    WeeklyTotalNotFound = 3101,

    // ==================== 4xxx: Work schedule ====================
    /// Date is already in the work schedule
    ScheduleDateExists = 4001,
    /// Date is not in the work schedule
    ScheduleDateNotFound = 4002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Cohort is being settled by another request, retry later
    CohortBusy = 9003,
    /// Record saved but tip-outs were not recomputed
    PartialCommit = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the client may safely retry the same request
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::CohortBusy | ErrorCode::RevisionConflict | ErrorCode::PartialCommit
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // Input
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Team
            ErrorCode::TeamNotFound => "Team not found",
            ErrorCode::TeamNameExists => "Team name already exists",

            // Team member
            ErrorCode::TeamMemberNotFound => "Team member not found",
            ErrorCode::UnknownPosition => "Unknown position",
            ErrorCode::RevisionConflict => "Team member was modified concurrently",

            // Totals
            ErrorCode::DailyTotalNotFound => "Daily total not found",
            ErrorCode::DailyTotalExists => "Daily total already exists for this date",
            ErrorCode::WeeklyTotalNotFound => "Weekly total not found",

            // Work schedule
            ErrorCode::ScheduleDateExists => "Date already exists in the work schedule",
            ErrorCode::ScheduleDateNotFound => "Date not found in the work schedule",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::CohortBusy => "Tip-outs for this date are being recalculated, retry later",
            ErrorCode::PartialCommit => "Record saved but tip-outs may be stale",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // Input
            2 => Ok(ErrorCode::ValidationFailed),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Team
            1001 => Ok(ErrorCode::TeamNotFound),
            1002 => Ok(ErrorCode::TeamNameExists),

            // Team member
            2001 => Ok(ErrorCode::TeamMemberNotFound),
            2002 => Ok(ErrorCode::UnknownPosition),
            2003 => Ok(ErrorCode::RevisionConflict),

            // Totals
            3001 => Ok(ErrorCode::DailyTotalNotFound),
            3002 => Ok(ErrorCode::DailyTotalExists),
            3101 => Ok(ErrorCode::WeeklyTotalNotFound),

            // Work schedule
            4001 => Ok(ErrorCode::ScheduleDateExists),
            4002 => Ok(ErrorCode::ScheduleDateNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::CohortBusy),
            9004 => Ok(ErrorCode::PartialCommit),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::RequiredField.code(), 7);
        assert_eq!(ErrorCode::TeamNotFound.code(), 1001);
        assert_eq!(ErrorCode::TeamMemberNotFound.code(), 2001);
        assert_eq!(ErrorCode::DailyTotalExists.code(), 3002);
        assert_eq!(ErrorCode::ScheduleDateExists.code(), 4001);
        assert_eq!(ErrorCode::CohortBusy.code(), 9003);
    }

    #[test]
    fn test_try_from_every_code() {
        let codes = [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::TeamNotFound,
            ErrorCode::TeamNameExists,
            ErrorCode::TeamMemberNotFound,
            ErrorCode::UnknownPosition,
            ErrorCode::RevisionConflict,
            ErrorCode::DailyTotalNotFound,
            ErrorCode::DailyTotalExists,
            ErrorCode::WeeklyTotalNotFound,
            ErrorCode::ScheduleDateExists,
            ErrorCode::ScheduleDateNotFound,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::CohortBusy,
            ErrorCode::PartialCommit,
            ErrorCode::ConfigError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        // Removed general codes are rejected too
        let result: Result<ErrorCode, _> = serde_json::from_str("3");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::DailyTotalExists).unwrap();
        assert_eq!(json, "3002");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::InvalidFormat), "6");
        assert_eq!(format!("{}", ErrorCode::TeamNotFound), "1001");
        assert_eq!(format!("{}", ErrorCode::InternalError), "9001");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::CohortBusy.is_retryable());
        assert!(ErrorCode::RevisionConflict.is_retryable());
        assert!(!ErrorCode::ValidationFailed.is_retryable());
        assert!(!ErrorCode::DailyTotalExists.is_retryable());
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
