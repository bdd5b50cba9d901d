//! Team member positions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job position of a team member
///
/// Servers pay tip-outs; every other position receives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Server,
    Bartender,
    Runner,
    Host,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Server,
        Position::Bartender,
        Position::Runner,
        Position::Host,
    ];

    /// Positions that receive a share of the servers' tip-outs
    pub const RECIPIENTS: [Position; 3] = [Position::Bartender, Position::Runner, Position::Host];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Server => "server",
            Position::Bartender => "bartender",
            Position::Runner => "runner",
            Position::Host => "host",
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Position::Server)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a position string is not one of the four known positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPosition(pub String);

impl fmt::Display for UnknownPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown position: {}", self.0)
    }
}

impl std::error::Error for UnknownPosition {}

impl FromStr for Position {
    type Err = UnknownPosition;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(Position::Server),
            "bartender" => Ok(Position::Bartender),
            "runner" => Ok(Position::Runner),
            "host" => Ok(Position::Host),
            _ => Err(UnknownPosition(s.to_string())),
        }
    }
}
