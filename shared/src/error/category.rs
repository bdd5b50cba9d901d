//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: Input errors
/// - 1xxx: Team errors
/// - 2xxx: Team member errors
/// - 3xxx: Daily / weekly total errors
/// - 4xxx: Work schedule errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Input errors (0xxx)
    Input,
    /// Team errors (1xxx)
    Team,
    /// Team member errors (2xxx)
    TeamMember,
    /// Daily / weekly total errors (3xxx)
    Totals,
    /// Work schedule errors (4xxx)
    Schedule,
    /// System errors (5xxx-9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::Input,
            1000..2000 => Self::Team,
            2000..3000 => Self::TeamMember,
            3000..4000 => Self::Totals,
            4000..5000 => Self::Schedule,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Team => "team",
            Self::TeamMember => "team_member",
            Self::Totals => "totals",
            Self::Schedule => "schedule",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::Input);
        assert_eq!(ErrorCategory::from_code(7), ErrorCategory::Input);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Team);
        assert_eq!(ErrorCategory::from_code(2003), ErrorCategory::TeamMember);
        assert_eq!(ErrorCategory::from_code(3101), ErrorCategory::Totals);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Schedule);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::InvalidFormat.category(), ErrorCategory::Input);
        assert_eq!(ErrorCode::TeamNameExists.category(), ErrorCategory::Team);
        assert_eq!(
            ErrorCode::UnknownPosition.category(),
            ErrorCategory::TeamMember
        );
        assert_eq!(
            ErrorCode::DailyTotalExists.category(),
            ErrorCategory::Totals
        );
        assert_eq!(
            ErrorCode::ScheduleDateExists.category(),
            ErrorCategory::Schedule
        );
        assert_eq!(ErrorCode::CohortBusy.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::TeamMember).unwrap();
        assert_eq!(json, "\"team_member\"");

        let category: ErrorCategory = serde_json::from_str("\"schedule\"").unwrap();
        assert_eq!(category, ErrorCategory::Schedule);
    }
}
