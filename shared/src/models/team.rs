//! Team Model

use serde::{Deserialize, Serialize};

/// A team groups the members whose tips are pooled together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    /// Unique, non-empty
    pub name: String,
    /// Member ids, unique
    #[serde(default)]
    pub members: Vec<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Team {
    pub fn has_member(&self, member_id: i64) -> bool {
        self.members.contains(&member_id)
    }
}

/// Create team payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCreate {
    pub name: Option<String>,
}

/// Update team payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamUpdate {
    pub name: Option<String>,
}
