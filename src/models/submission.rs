//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContestId, ProblemId, SubmissionId, UserId};

/// Judging status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Running,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    CompilationError,
    InternalError,
}

/// Submission row shown in history views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub contest_id: Option<ContestId>,
    pub problem_id: ProblemId,
    pub user_id: UserId,
    pub username: String,
    pub language: String,
    pub status: SubmissionStatus,
    pub score: Option<i32>,
    pub execution_time_ms: Option<u32>,
    pub memory_usage_kb: Option<u64>,
    pub submitted_at: DateTime<Utc>,
}
