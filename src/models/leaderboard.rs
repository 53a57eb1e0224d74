//! Leaderboard projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProblemId, UserId};

/// Per-problem cell of a leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResult {
    pub problem_id: ProblemId,
    pub solved: bool,
    pub attempts: u32,
    pub points: Option<i32>,
    pub time_to_solve_minutes: Option<i64>,
    #[serde(default)]
    pub is_first_solve: bool,
}

/// Leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub score: i64,
    /// Penalty time in minutes
    pub penalty: i64,
    pub problems_solved: u32,
    #[serde(default)]
    pub problem_results: Vec<ProblemResult>,
    pub last_accepted_at: Option<DateTime<Utc>>,
}

/// One participant's standing with their per-problem breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetail {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub rank: Option<u32>,
    pub score: i64,
    pub penalty: i64,
    pub problems_solved: u32,
    #[serde(default)]
    pub problem_results: Vec<ProblemResult>,
    pub registered_at: DateTime<Utc>,
}
