//! Problem model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProblemId, TagId, TopicId};

/// Problem difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "EASY"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Hard => write!(f, "HARD"),
        }
    }
}

/// Who can see a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    ContestOnly,
}

/// Access tier of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProblemType {
    #[default]
    Free,
    Premium,
}

/// Worked example shown to users
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTestcase {
    pub input: String,
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Hidden grading file already stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestcaseFileRef {
    pub id: uuid::Uuid,
    pub file_url: String,
}

/// Lightweight tag/topic reference embedded in a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: uuid::Uuid,
    pub name: String,
}

/// Problem as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub input_description: String,
    pub output_description: String,
    #[serde(default)]
    pub constraints: String,
    pub time_limit_ms: u32,
    pub memory_limit_mb: u32,
    pub max_score: u32,
    pub difficulty: Difficulty,
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    #[serde(default)]
    pub topics: Vec<NamedRef>,
    #[serde(default)]
    pub tags: Vec<NamedRef>,
    #[serde(default)]
    pub sample_testcases: Vec<SampleTestcase>,
    pub testcase_file: Option<TestcaseFileRef>,
    pub official_solution_content: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of the create/update problem calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemPayload {
    pub title: String,
    pub description: String,
    pub input_description: String,
    pub output_description: String,
    pub constraints: String,
    pub time_limit_ms: u32,
    pub memory_limit_mb: u32,
    pub max_score: u32,
    pub difficulty: Difficulty,
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub topic_ids: Vec<TopicId>,
    pub tag_ids: Vec<TagId>,
    pub sample_testcases: Vec<SampleTestcase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_solution_content: Option<String>,
    pub hints: Vec<String>,
}
