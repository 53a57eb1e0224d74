//! Contest form, problem ordering and batch scoring.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::{
    MAX_CONTEST_DESCRIPTION_LENGTH, MAX_CONTEST_DURATION_MINUTES, MAX_CONTEST_TITLE_LENGTH,
};
use crate::drafts::{load_draft, save_draft, DraftKind, DraftRepository};
use crate::error::{AdminError, AdminResult};
use crate::forms::field_messages;
use crate::models::{
    Contest, ContestId, ContestPayload, ContestProblem, ContestProblemPayload, ContestStatus,
    ProblemId,
};
use crate::notify::{Notifier, Toast};
use crate::services::ContestsService;
use crate::state::AdminState;
use crate::utils::time::{end_time_from_duration, format_duration, minutes_between, now_utc};
use crate::utils::validation::sanitize_string;

/// How the contest length is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContestLength {
    DurationMinutes(i64),
    EndTime(DateTime<Utc>),
}

impl Default for ContestLength {
    fn default() -> Self {
        Self::DurationMinutes(120)
    }
}

/// Everything the contest form edits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ContestFormValues {
    #[validate(length(min = 1, max = MAX_CONTEST_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH, message = "Description is too long"))]
    pub description: String,

    pub start_time: Option<DateTime<Utc>>,
    pub length: ContestLength,
    pub status: ContestStatus,

    #[validate(custom(function = "validate_contest_problems"))]
    pub problems: Vec<ContestProblem>,
}

fn validate_contest_problems(problems: &[ContestProblem]) -> Result<(), ValidationError> {
    if problems.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Add at least one problem".into());
        return Err(err);
    }

    if problems.iter().any(|p| p.points < 0) {
        let mut err = ValidationError::new("negative_points");
        err.message = Some("Points cannot be negative".into());
        return Err(err);
    }

    let mut seen = HashSet::new();
    if !problems.iter().all(|p| seen.insert(p.problem_id)) {
        let mut err = ValidationError::new("duplicate");
        err.message = Some("A problem appears twice".into());
        return Err(err);
    }

    Ok(())
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

impl ContestFormValues {
    pub fn from_contest(contest: &Contest) -> Self {
        let mut problems = contest.problems.clone();
        problems.sort_by_key(|p| p.order_index);

        let mut values = Self {
            title: contest.title.clone(),
            description: contest.description.clone(),
            start_time: Some(contest.start_time),
            length: ContestLength::DurationMinutes(contest.duration_minutes),
            status: contest.status,
            problems,
        };
        values.renumber();
        values
    }

    /// End of the contest, if a start time is set
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        let start = self.start_time?;
        Some(match self.length {
            ContestLength::DurationMinutes(minutes) => end_time_from_duration(start, minutes),
            ContestLength::EndTime(end) => end,
        })
    }

    /// Length in minutes, if it can be derived
    pub fn duration_minutes(&self) -> Option<i64> {
        match self.length {
            ContestLength::DurationMinutes(minutes) => Some(minutes),
            ContestLength::EndTime(end) => self.start_time.map(|start| minutes_between(start, end)),
        }
    }

    /// Whole-entity validation. A start time in the past is only rejected
    /// when `creating`.
    pub fn validate_at(&self, creating: bool, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        if let ContestLength::DurationMinutes(minutes) = self.length {
            if minutes <= 0 || minutes > MAX_CONTEST_DURATION_MINUTES {
                errors.add(
                    "duration_minutes",
                    field_error("range", "Duration must be between 1 minute and 30 days"),
                );
            }
        }

        match self.start_time {
            None => errors.add("start_time", field_error("required", "Start time is required")),
            Some(start) => {
                if creating && start <= now {
                    errors.add(
                        "start_time",
                        field_error("start_in_past", "Start time must be in the future"),
                    );
                }
                if let ContestLength::EndTime(end) = self.length {
                    if end <= start {
                        errors.add(
                            "end_time",
                            field_error("end_before_start", "End time must be after start time"),
                        );
                    }
                }
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the wire payload. Both end time and duration are always sent.
    pub fn to_payload(&self) -> AdminResult<ContestPayload> {
        let (Some(start_time), Some(end_time), Some(duration_minutes)) =
            (self.start_time, self.end_time(), self.duration_minutes())
        else {
            return Err(AdminError::Internal(anyhow::anyhow!(
                "contest payload built without a start time"
            )));
        };

        Ok(ContestPayload {
            title: sanitize_string(&self.title),
            description: self.description.trim().to_string(),
            start_time,
            end_time,
            duration_minutes,
            status: self.status,
            problems: self
                .problems
                .iter()
                .map(|p| ContestProblemPayload {
                    problem_id: p.problem_id,
                    order_index: p.order_index,
                    points: p.points,
                })
                .collect(),
        })
    }

    /// Append a problem at the end. Returns false if it is already in the contest.
    pub fn add_problem(&mut self, problem_id: ProblemId, title: Option<String>, points: i32) -> bool {
        if self.problems.iter().any(|p| p.problem_id == problem_id) {
            return false;
        }
        self.problems.push(ContestProblem {
            problem_id,
            order_index: 0,
            points,
            title,
        });
        self.renumber();
        true
    }

    pub fn remove_problem(&mut self, problem_id: ProblemId) -> bool {
        let before = self.problems.len();
        self.problems.retain(|p| p.problem_id != problem_id);
        self.renumber();
        self.problems.len() != before
    }

    /// Move the problem at `from` so that it ends up at `to`
    pub fn move_problem(&mut self, from: usize, to: usize) -> bool {
        if from >= self.problems.len() || to >= self.problems.len() || from == to {
            return false;
        }
        let problem = self.problems.remove(from);
        self.problems.insert(to, problem);
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (index, problem) in self.problems.iter_mut().enumerate() {
            problem.order_index = index as u32;
        }
    }
}

/// Points for several contest problems, applied in one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemScoreSheet {
    points: BTreeMap<ProblemId, i32>,
}

impl ProblemScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet pre-filled with the current points
    pub fn from_problems(problems: &[ContestProblem]) -> Self {
        Self {
            points: problems.iter().map(|p| (p.problem_id, p.points)).collect(),
        }
    }

    /// Sheet scoring a single problem
    pub fn single(problem_id: ProblemId, points: i32) -> Self {
        Self {
            points: BTreeMap::from([(problem_id, points)]),
        }
    }

    pub fn set(&mut self, problem_id: ProblemId, points: i32) {
        self.points.insert(problem_id, points);
    }

    pub fn get(&self, problem_id: ProblemId) -> Option<i32> {
        self.points.get(&problem_id).copied()
    }

    pub fn total(&self) -> i64 {
        self.points.values().map(|&p| i64::from(p)).sum()
    }

    /// Check every entry against the contest's problem list
    pub fn validate(&self, problems: &[ContestProblem]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.points.values().any(|&p| p < 0) {
            errors.add("problems", field_error("negative_points", "Points cannot be negative"));
        }
        if self
            .points
            .keys()
            .any(|id| !problems.iter().any(|p| p.problem_id == *id))
        {
            errors.add(
                "problems",
                field_error("unknown_problem", "Scored problem is not part of the contest"),
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Write the points into `values`. Nothing is written if any entry is invalid.
    /// Returns the number of problems whose points changed.
    pub fn apply_to(&self, values: &mut ContestFormValues) -> Result<usize, ValidationErrors> {
        self.validate(&values.problems)?;

        let mut changed = 0;
        for problem in &mut values.problems {
            if let Some(points) = self.get(problem.problem_id) {
                if problem.points != points {
                    problem.points = points;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }
}

/// Controller behind the contest create/edit page
pub struct ContestForm {
    contests: Arc<dyn ContestsService>,
    drafts: Arc<dyn DraftRepository>,
    notifier: Arc<dyn Notifier>,
    /// `None` until the contest exists on the server
    contest_id: Option<ContestId>,
    values: ContestFormValues,
    errors: Option<ValidationErrors>,
}

impl ContestForm {
    /// Start a create session, seeded from the stored draft
    pub fn create(state: &AdminState) -> Self {
        let drafts = state.drafts();
        let values = load_draft::<ContestFormValues, _>(drafts.as_ref(), DraftKind::Contest)
            .unwrap_or_default();
        Self::build(state, None, values)
    }

    pub fn edit(state: &AdminState, contest: &Contest) -> Self {
        Self::build(state, Some(contest.id), ContestFormValues::from_contest(contest))
    }

    fn build(state: &AdminState, contest_id: Option<ContestId>, values: ContestFormValues) -> Self {
        Self {
            contests: state.contests(),
            drafts: state.drafts(),
            notifier: state.notifier(),
            contest_id,
            values,
            errors: None,
        }
    }

    pub fn values(&self) -> &ContestFormValues {
        &self.values
    }

    pub fn contest_id(&self) -> Option<ContestId> {
        self.contest_id
    }

    pub fn field_messages(&self, field: &str) -> Vec<String> {
        field_messages(self.errors.as_ref(), field)
    }

    pub fn update(&mut self, edit: impl FnOnce(&mut ContestFormValues)) -> AdminResult<()> {
        edit(&mut self.values);
        self.mirror()
    }

    fn mirror(&self) -> AdminResult<()> {
        if self.contest_id.is_none() {
            save_draft(self.drafts.as_ref(), DraftKind::Contest, &self.values)?;
        }
        Ok(())
    }

    /// Apply a score sheet from the scoring dialog
    pub fn apply_scores(&mut self, sheet: &ProblemScoreSheet) -> AdminResult<usize> {
        match sheet.apply_to(&mut self.values) {
            Ok(changed) => {
                self.mirror()?;
                Ok(changed)
            }
            Err(errors) => {
                tracing::warn!("score sheet rejected");
                self.notifier.notify(Toast::error("Points must be zero or more"));
                Err(AdminError::Validation(errors))
            }
        }
    }

    pub async fn submit(&mut self) -> AdminResult<Contest> {
        self.submit_at(now_utc()).await
    }

    /// Submit with an explicit clock
    pub async fn submit_at(&mut self, now: DateTime<Utc>) -> AdminResult<Contest> {
        if let Err(errors) = self.values.validate_at(self.contest_id.is_none(), now) {
            tracing::warn!(
                fields = ?errors.errors().keys().map(|k| k.to_string()).collect::<Vec<_>>(),
                "contest form has validation errors"
            );
            self.notifier
                .notify(Toast::error("Please fix the highlighted fields"));
            self.errors = Some(errors.clone());
            return Err(AdminError::Validation(errors));
        }
        self.errors = None;

        let payload = self.values.to_payload()?;
        let creating = self.contest_id.is_none();
        let result = match self.contest_id {
            None => self.contests.create(&payload).await,
            Some(id) => self.contests.update(id, &payload).await,
        };

        match result {
            Ok(contest) => {
                self.contest_id = Some(contest.id);
                if creating {
                    self.drafts.clear(DraftKind::Contest);
                }
                tracing::info!(contest_id = %contest.id, "contest saved");
                self.notifier.notify(Toast::success(format!(
                    "Contest \"{}\" saved ({})",
                    contest.title,
                    format_duration(Duration::minutes(payload.duration_minutes))
                )));
                Ok(contest)
            }
            Err(e) => {
                let err = AdminError::from(e);
                tracing::error!("failed to save contest: {}", err);
                self.notifier.notify(Toast::error(err.user_message()));
                Err(err)
            }
        }
    }

    pub fn discard(self) {
        if self.contest_id.is_none() {
            self.drafts.clear(DraftKind::Contest);
        }
    }
}
