//! Contest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContestId, ProblemId};

/// Contest status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContestStatus {
    #[default]
    Draft,
    Upcoming,
    Ongoing,
    Ended,
}

impl ContestStatus {
    /// Whether standings can still change
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Ongoing)
    }
}

impl std::fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Upcoming => write!(f, "UPCOMING"),
            Self::Ongoing => write!(f, "ONGOING"),
            Self::Ended => write!(f, "ENDED"),
        }
    }
}

/// Problem slot inside a contest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestProblem {
    pub problem_id: ProblemId,
    pub order_index: u32,
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Contest as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: ContestId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: ContestStatus,
    #[serde(default)]
    pub problems: Vec<ContestProblem>,
    #[serde(default)]
    pub participant_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Problem entry of the create/update contest calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestProblemPayload {
    pub problem_id: ProblemId,
    pub order_index: u32,
    pub points: i32,
}

/// Body of the create/update contest calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestPayload {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: ContestStatus,
    pub problems: Vec<ContestProblemPayload>,
}
