//! Problem form values and their validation schema.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::{
    MAX_MAX_SCORE, MAX_MEMORY_LIMIT_MB, MAX_PROBLEM_DESCRIPTION_LENGTH, MAX_PROBLEM_TITLE_LENGTH,
    MAX_TIME_LIMIT_MS, MIN_MAX_SCORE, MIN_MEMORY_LIMIT_MB, MIN_TIME_LIMIT_MS,
};
use crate::models::{
    Difficulty, NamedRef, Problem, ProblemPayload, ProblemType, SampleTestcase, TestcaseFileRef,
    Visibility,
};
use crate::services::TestcaseUpload;
use crate::utils::validation::{sanitize_optional, sanitize_string};

/// Everything the problem wizard edits.
///
/// `testcase_file` and `existing_testcase_file` are skipped by serde, so they
/// never reach the draft store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemFormValues {
    #[validate(length(min = 1, max = MAX_PROBLEM_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = MAX_PROBLEM_DESCRIPTION_LENGTH,
        message = "Description is required"
    ))]
    pub description: String,

    #[validate(length(min = 1, message = "Input description is required"))]
    pub input_description: String,

    #[validate(length(min = 1, message = "Output description is required"))]
    pub output_description: String,

    pub constraints: String,

    #[validate(range(
        min = MIN_TIME_LIMIT_MS,
        max = MAX_TIME_LIMIT_MS,
        message = "Time limit must be 100-30000 ms"
    ))]
    pub time_limit_ms: u32,

    #[validate(range(
        min = MIN_MEMORY_LIMIT_MB,
        max = MAX_MEMORY_LIMIT_MB,
        message = "Memory limit must be 16-1024 MB"
    ))]
    pub memory_limit_mb: u32,

    #[validate(range(min = MIN_MAX_SCORE, max = MAX_MAX_SCORE, message = "Max score must be 1-10000"))]
    pub max_score: u32,

    pub difficulty: Difficulty,
    pub visibility: Visibility,

    #[serde(rename = "type")]
    pub problem_type: ProblemType,

    #[validate(custom(function = "validate_topics"))]
    pub topics: Vec<NamedRef>,

    #[validate(custom(function = "validate_unique_refs"))]
    pub tags: Vec<NamedRef>,

    #[validate(custom(function = "validate_sample_testcases"))]
    pub sample_testcases: Vec<SampleTestcase>,

    /// Newly picked file, already accepted by the file validator
    #[serde(skip)]
    pub testcase_file: Option<TestcaseUpload>,

    /// File the backend already holds for this problem (edit mode)
    #[serde(skip)]
    pub existing_testcase_file: Option<TestcaseFileRef>,

    pub official_solution_content: Option<String>,

    #[validate(custom(function = "validate_hints"))]
    pub hints: Vec<String>,
}

impl Default for ProblemFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            input_description: String::new(),
            output_description: String::new(),
            constraints: String::new(),
            time_limit_ms: 1000,
            memory_limit_mb: 256,
            max_score: 100,
            difficulty: Difficulty::default(),
            visibility: Visibility::default(),
            problem_type: ProblemType::default(),
            topics: Vec::new(),
            tags: Vec::new(),
            sample_testcases: vec![SampleTestcase::default()],
            testcase_file: None,
            existing_testcase_file: None,
            official_solution_content: None,
            hints: Vec::new(),
        }
    }
}

fn validate_topics(topics: &[NamedRef]) -> Result<(), ValidationError> {
    if topics.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Select at least one topic".into());
        return Err(err);
    }
    validate_unique_refs(topics)
}

fn validate_unique_refs(refs: &[NamedRef]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    if refs.iter().all(|r| seen.insert(r.id)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("duplicate");
        err.message = Some("The same entry is selected twice".into());
        Err(err)
    }
}

fn validate_sample_testcases(samples: &[SampleTestcase]) -> Result<(), ValidationError> {
    if samples.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Add at least one sample test case".into());
        return Err(err);
    }

    if let Some(position) = samples
        .iter()
        .position(|s| s.input.trim().is_empty() || s.expected_output.trim().is_empty())
    {
        let mut err = ValidationError::new("incomplete_sample");
        err.message = Some(format!("Sample {} needs both input and expected output", position + 1).into());
        err.add_param("index".into(), &position);
        return Err(err);
    }

    Ok(())
}

fn validate_hints(hints: &[String]) -> Result<(), ValidationError> {
    if hints.iter().any(|h| h.trim().is_empty()) {
        let mut err = ValidationError::new("empty_hint");
        err.message = Some("Hints cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

impl ProblemFormValues {
    /// Values for editing an existing problem
    pub fn from_problem(problem: &Problem) -> Self {
        Self {
            title: problem.title.clone(),
            description: problem.description.clone(),
            input_description: problem.input_description.clone(),
            output_description: problem.output_description.clone(),
            constraints: problem.constraints.clone(),
            time_limit_ms: problem.time_limit_ms,
            memory_limit_mb: problem.memory_limit_mb,
            max_score: problem.max_score,
            difficulty: problem.difficulty,
            visibility: problem.visibility,
            problem_type: problem.problem_type,
            topics: problem.topics.clone(),
            tags: problem.tags.clone(),
            sample_testcases: problem.sample_testcases.clone(),
            testcase_file: None,
            existing_testcase_file: problem.testcase_file.clone(),
            official_solution_content: problem.official_solution_content.clone(),
            hints: problem.hints.clone(),
        }
    }

    /// Whole-entity validation run on submit.
    ///
    /// Adds the cross-field rule that a test-case file is either freshly picked
    /// or already stored.
    pub fn validate_for_submit(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.testcase_file.is_none() && self.existing_testcase_file.is_none() {
            let mut err = ValidationError::new("required");
            err.message = Some("Upload a test case file".into());
            errors.add("testcase_file", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the wire payload from validated values
    pub fn to_payload(&self) -> ProblemPayload {
        ProblemPayload {
            title: sanitize_string(&self.title),
            description: self.description.trim().to_string(),
            input_description: self.input_description.trim().to_string(),
            output_description: self.output_description.trim().to_string(),
            constraints: self.constraints.trim().to_string(),
            time_limit_ms: self.time_limit_ms,
            memory_limit_mb: self.memory_limit_mb,
            max_score: self.max_score,
            difficulty: self.difficulty,
            visibility: self.visibility,
            problem_type: self.problem_type,
            topic_ids: self.topics.iter().map(|t| t.id).collect(),
            tag_ids: self.tags.iter().map(|t| t.id).collect(),
            sample_testcases: self
                .sample_testcases
                .iter()
                .map(|s| SampleTestcase {
                    input: s.input.clone(),
                    expected_output: s.expected_output.clone(),
                    explanation: sanitize_optional(s.explanation.as_deref()),
                })
                .collect(),
            official_solution_content: sanitize_optional(self.official_solution_content.as_deref()),
            hints: self.hints.iter().map(|h| h.trim().to_string()).collect(),
        }
    }
}
