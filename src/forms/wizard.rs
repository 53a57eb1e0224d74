//! Multi-step problem wizard.
//!
//! Navigation between steps is never blocked. Validation runs on the whole
//! entity at submit time and failing fields are bucketed into the steps that
//! own them, so the host can badge those steps.

use std::collections::BTreeSet;
use std::sync::Arc;

use validator::ValidationErrors;

use crate::drafts::{load_draft, save_draft, DraftKind, DraftRepository};
use crate::error::{AdminError, AdminResult};
use crate::forms::field_messages;
use crate::forms::problem::ProblemFormValues;
use crate::forms::steps::{flag_steps, ProblemStep, PROBLEM_FIELD_STEPS};
use crate::models::{Problem, ProblemId, ProblemPayload};
use crate::notify::{Notifier, Toast};
use crate::services::ProblemsService;
use crate::state::AdminState;
use crate::testcases::{accept_testcase_file, TestcaseFile, TestcaseFileError, TestcaseFormat};

/// Whether the wizard creates a new problem or edits a stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit { problem_id: ProblemId },
}

/// Controller behind the five-step problem form
pub struct ProblemWizard {
    problems: Arc<dyn ProblemsService>,
    drafts: Arc<dyn DraftRepository>,
    notifier: Arc<dyn Notifier>,
    mode: WizardMode,
    started_as_create: bool,
    values: ProblemFormValues,
    current: ProblemStep,
    flagged: BTreeSet<ProblemStep>,
    errors: Option<ValidationErrors>,
    file_error: Option<TestcaseFileError>,
    allowed_formats: Vec<TestcaseFormat>,
    max_testcases: usize,
}

impl ProblemWizard {
    /// Start a create session, seeded once from the stored draft if there is one
    pub fn create(state: &AdminState) -> Self {
        let drafts = state.drafts();
        let values = load_draft::<ProblemFormValues, _>(drafts.as_ref(), DraftKind::Problem)
            .unwrap_or_default();

        Self::build(state, WizardMode::Create, values)
    }

    /// Start an edit session for a stored problem. Edits are not mirrored into drafts.
    pub fn edit(state: &AdminState, problem: &Problem) -> Self {
        Self::build(
            state,
            WizardMode::Edit {
                problem_id: problem.id,
            },
            ProblemFormValues::from_problem(problem),
        )
    }

    fn build(state: &AdminState, mode: WizardMode, values: ProblemFormValues) -> Self {
        Self {
            problems: state.problems(),
            drafts: state.drafts(),
            notifier: state.notifier(),
            mode,
            started_as_create: mode == WizardMode::Create,
            values,
            current: ProblemStep::GeneralInfo,
            flagged: BTreeSet::new(),
            errors: None,
            file_error: None,
            allowed_formats: vec![TestcaseFormat::Txt],
            max_testcases: state.config().testcases.max_count,
        }
    }

    /// Restrict or widen the accepted test-case file formats for this call site
    pub fn with_allowed_formats(mut self, formats: &[TestcaseFormat]) -> Self {
        self.allowed_formats = formats.to_vec();
        self
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn values(&self) -> &ProblemFormValues {
        &self.values
    }

    pub fn current_step(&self) -> ProblemStep {
        self.current
    }

    pub fn flagged_steps(&self) -> &BTreeSet<ProblemStep> {
        &self.flagged
    }

    pub fn is_flagged(&self, step: ProblemStep) -> bool {
        self.flagged.contains(&step)
    }

    /// Inline error for the file uploader
    pub fn file_error(&self) -> Option<&TestcaseFileError> {
        self.file_error.as_ref()
    }

    /// Messages to render under `field` after a failed submit
    pub fn field_messages(&self, field: &str) -> Vec<String> {
        field_messages(self.errors.as_ref(), field)
    }

    pub fn next(&mut self) -> ProblemStep {
        if let Some(step) = self.current.next() {
            self.current = step;
        }
        self.current
    }

    pub fn prev(&mut self) -> ProblemStep {
        if let Some(step) = self.current.prev() {
            self.current = step;
        }
        self.current
    }

    pub fn go_to(&mut self, step: ProblemStep) {
        self.current = step;
    }

    /// Apply an edit to the form values and mirror them into the draft slot
    pub fn update(&mut self, edit: impl FnOnce(&mut ProblemFormValues)) -> AdminResult<()> {
        edit(&mut self.values);

        if self.mode == WizardMode::Create {
            save_draft(self.drafts.as_ref(), DraftKind::Problem, &self.values)?;
        }
        Ok(())
    }

    /// Validate a picked file and keep it in form state if acceptable.
    ///
    /// Returns the number of test cases found. A rejected file leaves any
    /// previously accepted file in place.
    pub fn attach_testcase_file(&mut self, file: &TestcaseFile) -> AdminResult<usize> {
        match accept_testcase_file(file, &self.allowed_formats, self.max_testcases) {
            Ok(upload) => {
                let count = upload.testcase_count;
                self.values.testcase_file = Some(upload);
                self.file_error = None;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(file = %file.name, "test case file rejected: {}", e);
                self.notifier.notify(Toast::error(e.to_string()));
                self.file_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    /// Drop the picked file, or delete the stored one in edit mode
    pub async fn remove_testcase_file(&mut self) -> AdminResult<()> {
        if self.values.testcase_file.take().is_some() {
            return Ok(());
        }

        let (WizardMode::Edit { problem_id }, Some(existing)) =
            (self.mode, self.values.existing_testcase_file.clone())
        else {
            return Ok(());
        };

        match self.problems.remove_testcase_file(problem_id, existing.id).await {
            Ok(()) => {
                self.values.existing_testcase_file = None;
                self.notifier.notify(Toast::success("Test case file removed"));
                Ok(())
            }
            Err(e) => {
                let err = AdminError::from(e);
                tracing::error!(%problem_id, "failed to remove test case file: {}", err);
                self.notifier.notify(Toast::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Validate everything and send it to the backend.
    ///
    /// On validation failure no request is made. On service failure the form
    /// keeps its values so the user can retry.
    pub async fn submit(&mut self) -> AdminResult<Problem> {
        if let Err(errors) = self.values.validate_for_submit() {
            self.flagged = flag_steps(
                PROBLEM_FIELD_STEPS,
                errors.errors().keys().map(|k| k.to_string()),
            );
            let steps = self
                .flagged
                .iter()
                .map(|s| s.title())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(steps = %steps, "problem form has validation errors");
            self.notifier
                .notify(Toast::error(format!("Please fix the errors in: {steps}")));
            self.errors = Some(errors.clone());
            return Err(AdminError::Validation(errors));
        }

        self.flagged.clear();
        self.errors = None;

        let payload = self.values.to_payload();
        match self.persist(&payload).await {
            Ok(problem) => {
                if self.started_as_create {
                    self.drafts.clear(DraftKind::Problem);
                }
                tracing::info!(problem_id = %problem.id, "problem saved");
                self.notifier.notify(Toast::success(if self.started_as_create {
                    "Problem created"
                } else {
                    "Problem updated"
                }));
                Ok(problem)
            }
            Err(e) => {
                tracing::error!("failed to save problem: {}", e);
                self.notifier.notify(Toast::error(e.user_message()));
                Err(e)
            }
        }
    }

    async fn persist(&mut self, payload: &ProblemPayload) -> AdminResult<Problem> {
        let mut problem = match self.mode {
            WizardMode::Create => {
                let created = self.problems.create(payload).await?;
                // Later retries must not create a second problem.
                self.mode = WizardMode::Edit {
                    problem_id: created.id,
                };
                created
            }
            WizardMode::Edit { problem_id } => self.problems.update(problem_id, payload).await?,
        };

        if let Some(upload) = &self.values.testcase_file {
            let file_ref = self.problems.upload_testcase_file(problem.id, upload).await?;
            self.values.testcase_file = None;
            self.values.existing_testcase_file = Some(file_ref.clone());
            problem.testcase_file = Some(file_ref);
        }

        Ok(problem)
    }

    /// Abandon the session after the user confirmed cancelling
    pub fn discard(self) {
        if self.started_as_create {
            self.drafts.clear(DraftKind::Problem);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::models::SampleTestcase;
    use crate::notify::ToastLevel;
    use crate::services::MockProblemsService;
    use crate::test_utils::{fixtures, TestHarness};

    fn valid_file() -> TestcaseFile {
        TestcaseFile::new("cases.txt", Some("text/plain"), "1 2\n---\n3\n")
    }

    #[tokio::test]
    async fn test_submit_makes_one_create_call_with_selected_ids() {
        let values = fixtures::complete_problem_values();
        let tag_ids: Vec<_> = values.tags.iter().map(|t| t.id).collect();
        let topic_ids: Vec<_> = values.topics.iter().map(|t| t.id).collect();

        let mut problems = MockProblemsService::new();
        problems
            .expect_create()
            .times(1)
            .withf(move |p| p.tag_ids == tag_ids && p.topic_ids == topic_ids)
            .returning(|p| Ok(fixtures::problem_from_payload(p)));
        problems
            .expect_upload_testcase_file()
            .times(1)
            .returning(|_, _| Ok(fixtures::file_ref()));

        let harness = TestHarness::new().with_problems(problems);
        let mut wizard = ProblemWizard::create(&harness.state());
        wizard.update(|v| *v = values.clone()).unwrap();
        wizard.attach_testcase_file(&valid_file()).unwrap();

        let problem = wizard.submit().await.unwrap();
        assert!(problem.testcase_file.is_some());
        assert!(harness.drafts.get(DraftKind::Problem).is_none());
        assert_eq!(harness.notifier.last().unwrap().level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn test_sample_error_flags_test_cases_step_only() {
        let mut problems = MockProblemsService::new();
        problems.expect_create().never();

        let harness = TestHarness::new().with_problems(problems);
        let mut wizard = ProblemWizard::create(&harness.state());
        let mut values = fixtures::complete_problem_values();
        values.sample_testcases = vec![SampleTestcase::default()];
        wizard.update(|v| *v = values).unwrap();
        wizard.attach_testcase_file(&valid_file()).unwrap();

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
        assert_eq!(
            wizard.flagged_steps(),
            &BTreeSet::from([ProblemStep::TestCases])
        );
        assert_eq!(harness.notifier.count(), 1);
        assert!(!wizard.field_messages("sample_testcases").is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_and_title_flag_two_steps() {
        let harness = TestHarness::new();
        let mut wizard = ProblemWizard::create(&harness.state());
        let mut values = fixtures::complete_problem_values();
        values.title.clear();
        values.testcase_file = None;
        wizard.update(|v| *v = values).unwrap();

        assert!(wizard.submit().await.is_err());
        assert_eq!(
            wizard.flagged_steps(),
            &BTreeSet::from([ProblemStep::GeneralInfo, ProblemStep::TestCases])
        );
        assert_eq!(wizard.field_messages("title"), vec!["Title is required".to_string()]);
    }

    #[test]
    fn test_navigation_is_never_blocked() {
        let harness = TestHarness::new();
        let mut wizard = ProblemWizard::create(&harness.state());
        assert_eq!(wizard.prev(), ProblemStep::GeneralInfo);
        wizard.go_to(ProblemStep::SolutionAndHints);
        assert_eq!(wizard.next(), ProblemStep::SolutionAndHints);
        assert_eq!(wizard.prev(), ProblemStep::TestCases);
    }

    #[test]
    fn test_edits_are_mirrored_into_draft_without_files() {
        let harness = TestHarness::new();
        let mut wizard = ProblemWizard::create(&harness.state());
        wizard.update(|v| v.title = "Two Sum".to_string()).unwrap();
        wizard.attach_testcase_file(&valid_file()).unwrap();
        wizard.update(|v| v.title = "Two Sum".to_string()).unwrap();

        let draft = harness.drafts.get(DraftKind::Problem).unwrap();
        assert_eq!(draft["title"], "Two Sum");
        assert!(!draft.contains_key("testcaseFile"));
        assert_eq!(harness.drafts.revision(DraftKind::Problem), 1);

        // A new session resumes from the draft
        let resumed = ProblemWizard::create(&harness.state());
        assert_eq!(resumed.values().title, "Two Sum");
        assert!(resumed.values().testcase_file.is_none());
    }

    #[test]
    fn test_rejected_file_keeps_previous_file() {
        let harness = TestHarness::new();
        let mut wizard = ProblemWizard::create(&harness.state());
        wizard.attach_testcase_file(&valid_file()).unwrap();

        let bad = TestcaseFile::new("cases.pdf", Some("application/pdf"), "x");
        let err = wizard.attach_testcase_file(&bad).unwrap_err();
        assert!(matches!(err, AdminError::InvalidFile(_)));
        assert!(wizard.values().testcase_file.is_some());
        assert!(wizard.file_error().is_some());
        assert_eq!(harness.notifier.last().unwrap().level, ToastLevel::Error);
    }

    #[test]
    fn test_call_site_picks_allowed_formats() {
        let harness = TestHarness::new();
        let mut wizard =
            ProblemWizard::create(&harness.state()).with_allowed_formats(&[TestcaseFormat::Json]);

        assert!(wizard.attach_testcase_file(&valid_file()).is_err());

        let json = TestcaseFile::new(
            "cases.json",
            None,
            r#"[{"input": "1 2", "output": "3"}, {"input": "2 2", "output": "4"}]"#,
        );
        assert_eq!(wizard.attach_testcase_file(&json).unwrap(), 2);
        assert_eq!(
            wizard.values().testcase_file.as_ref().unwrap().mime_type,
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_failed_upload_retries_without_recreating() {
        let mut problems = MockProblemsService::new();
        problems
            .expect_create()
            .times(1)
            .returning(|p| Ok(fixtures::problem_from_payload(p)));
        problems
            .expect_update()
            .times(1)
            .returning(|_, p| Ok(fixtures::problem_from_payload(p)));

        let mut uploads = 0;
        problems
            .expect_upload_testcase_file()
            .times(2)
            .returning(move |_, _| {
                uploads += 1;
                if uploads == 1 {
                    Err(ServiceError::Network("connection reset".to_string()))
                } else {
                    Ok(fixtures::file_ref())
                }
            });

        let harness = TestHarness::new().with_problems(problems);
        let mut wizard = ProblemWizard::create(&harness.state());
        let values = fixtures::complete_problem_values();
        wizard.update(|v| *v = values).unwrap();
        wizard.attach_testcase_file(&valid_file()).unwrap();

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, AdminError::Service(_)));
        assert!(matches!(wizard.mode(), WizardMode::Edit { .. }));
        assert!(wizard.values().testcase_file.is_some());
        assert!(harness.drafts.get(DraftKind::Problem).is_some());

        wizard.submit().await.unwrap();
        assert!(harness.drafts.get(DraftKind::Problem).is_none());
    }

    #[tokio::test]
    async fn test_edit_mode_accepts_existing_file() {
        let stored = fixtures::stored_problem();
        let mut problems = MockProblemsService::new();
        problems.expect_create().never();
        problems
            .expect_update()
            .times(1)
            .returning(|_, p| Ok(fixtures::problem_from_payload(p)));
        problems.expect_upload_testcase_file().never();

        let harness = TestHarness::new().with_problems(problems);
        let mut wizard = ProblemWizard::edit(&harness.state(), &stored);
        wizard.update(|v| v.max_score = 200).unwrap();

        wizard.submit().await.unwrap();
        assert!(harness.drafts.get(DraftKind::Problem).is_none());
        assert_eq!(harness.notifier.last().unwrap().message, "Problem updated");
    }

    #[tokio::test]
    async fn test_remove_stored_file_in_edit_mode() {
        let stored = fixtures::stored_problem();
        let file_id = stored.testcase_file.as_ref().unwrap().id;
        let problem_id = stored.id;

        let mut problems = MockProblemsService::new();
        problems
            .expect_remove_testcase_file()
            .times(1)
            .withf(move |id, f| *id == problem_id && *f == file_id)
            .returning(|_, _| Ok(()));

        let harness = TestHarness::new().with_problems(problems);
        let mut wizard = ProblemWizard::edit(&harness.state(), &stored);
        tokio_test::assert_ok!(wizard.remove_testcase_file().await);
        assert!(wizard.values().existing_testcase_file.is_none());
    }

    #[test]
    fn test_discard_clears_draft() {
        let harness = TestHarness::new();
        let mut wizard = ProblemWizard::create(&harness.state());
        wizard.update(|v| v.title = "Scratch".to_string()).unwrap();
        wizard.discard();
        assert!(harness.drafts.get(DraftKind::Problem).is_none());
    }
}
