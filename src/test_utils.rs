//! Shared test helpers: a recording notifier, a harness wiring mocks into
//! [`AdminState`], and entity fixtures.

use std::sync::{Arc, Mutex};

use crate::config::AdminConfig;
use crate::drafts::DraftStore;
use crate::notify::{Notifier, Toast};
use crate::services::{
    MockContestsService, MockProblemsService, MockRolesService, MockSubmissionsService,
    MockTagsService, MockTopicsService,
};
use crate::state::{AdminState, Services};

/// Notifier that keeps every toast for inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.toasts.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

/// Mocks with no expectations, a fresh draft store and a recording notifier
pub struct TestHarness {
    services: Services,
    pub drafts: Arc<DraftStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub config: AdminConfig,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            services: Services {
                tags: Arc::new(MockTagsService::new()),
                topics: Arc::new(MockTopicsService::new()),
                roles: Arc::new(MockRolesService::new()),
                problems: Arc::new(MockProblemsService::new()),
                contests: Arc::new(MockContestsService::new()),
                submissions: Arc::new(MockSubmissionsService::new()),
            },
            drafts: Arc::new(DraftStore::new()),
            notifier: Arc::new(RecordingNotifier::default()),
            config: AdminConfig::default(),
        }
    }

    pub fn with_tags(mut self, mock: MockTagsService) -> Self {
        self.services.tags = Arc::new(mock);
        self
    }

    pub fn with_topics(mut self, mock: MockTopicsService) -> Self {
        self.services.topics = Arc::new(mock);
        self
    }

    pub fn with_roles(mut self, mock: MockRolesService) -> Self {
        self.services.roles = Arc::new(mock);
        self
    }

    pub fn with_problems(mut self, mock: MockProblemsService) -> Self {
        self.services.problems = Arc::new(mock);
        self
    }

    pub fn with_contests(mut self, mock: MockContestsService) -> Self {
        self.services.contests = Arc::new(mock);
        self
    }

    pub fn with_submissions(mut self, mock: MockSubmissionsService) -> Self {
        self.services.submissions = Arc::new(mock);
        self
    }

    /// State sharing this harness's mocks, drafts and notifier
    pub fn state(&self) -> AdminState {
        AdminState::new(
            self.services.clone(),
            self.drafts.clone(),
            self.notifier.clone(),
            self.config.clone(),
        )
    }
}

pub mod fixtures {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use crate::forms::ProblemFormValues;
    use crate::models::*;
    use crate::services::TestcaseUpload;
    use crate::utils::slugify;
    use crate::utils::time::{end_time_from_duration, now_utc};

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    pub fn named_ref(name: &str) -> NamedRef {
        NamedRef {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    pub fn file_ref() -> TestcaseFileRef {
        TestcaseFileRef {
            id: Uuid::new_v4(),
            file_url: "/uploads/testcases/cases.txt".to_string(),
        }
    }

    /// Values that pass every rule, including a picked test-case file
    pub fn complete_problem_values() -> ProblemFormValues {
        ProblemFormValues {
            title: "Two Sum".to_string(),
            description: "Add two integers.".to_string(),
            input_description: "Two integers a and b.".to_string(),
            output_description: "Their sum.".to_string(),
            constraints: "-10^9 <= a, b <= 10^9".to_string(),
            topics: vec![named_ref("Math")],
            tags: vec![named_ref("Easy Wins"), named_ref("Arithmetic")],
            sample_testcases: vec![SampleTestcase {
                input: "1 2".to_string(),
                expected_output: "3".to_string(),
                explanation: Some("1 + 2 = 3".to_string()),
            }],
            testcase_file: Some(TestcaseUpload {
                file_name: "cases.txt".to_string(),
                mime_type: "text/plain".to_string(),
                bytes: b"1 2\n---\n3\n".to_vec(),
                testcase_count: 1,
            }),
            hints: vec!["Mind the overflow".to_string()],
            ..Default::default()
        }
    }

    pub fn problem_from_payload(payload: &ProblemPayload) -> Problem {
        Problem {
            id: Uuid::new_v4(),
            title: payload.title.clone(),
            slug: slugify(&payload.title),
            description: payload.description.clone(),
            input_description: payload.input_description.clone(),
            output_description: payload.output_description.clone(),
            constraints: payload.constraints.clone(),
            time_limit_ms: payload.time_limit_ms,
            memory_limit_mb: payload.memory_limit_mb,
            max_score: payload.max_score,
            difficulty: payload.difficulty,
            visibility: payload.visibility,
            problem_type: payload.problem_type,
            topics: payload
                .topic_ids
                .iter()
                .map(|id| NamedRef { id: *id, name: "topic".to_string() })
                .collect(),
            tags: payload
                .tag_ids
                .iter()
                .map(|id| NamedRef { id: *id, name: "tag".to_string() })
                .collect(),
            sample_testcases: payload.sample_testcases.clone(),
            testcase_file: None,
            official_solution_content: payload.official_solution_content.clone(),
            hints: payload.hints.clone(),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    /// A problem as the backend returns it, with a stored test-case file
    pub fn stored_problem() -> Problem {
        let mut problem = problem_from_payload(&complete_problem_values().to_payload());
        problem.topics = vec![named_ref("Math")];
        problem.testcase_file = Some(file_ref());
        problem
    }

    pub fn contest_from_payload(payload: &ContestPayload) -> Contest {
        Contest {
            id: Uuid::new_v4(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            start_time: payload.start_time,
            end_time: payload.end_time,
            duration_minutes: payload.duration_minutes,
            status: payload.status,
            problems: payload
                .problems
                .iter()
                .map(|p| ContestProblem {
                    problem_id: p.problem_id,
                    order_index: p.order_index,
                    points: p.points,
                    title: None,
                })
                .collect(),
            participant_count: 0,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    pub fn contest(status: ContestStatus) -> Contest {
        let start = now_utc();
        Contest {
            id: Uuid::new_v4(),
            title: "Weekly Round".to_string(),
            description: String::new(),
            start_time: start,
            end_time: end_time_from_duration(start, 120),
            duration_minutes: 120,
            status,
            problems: Vec::new(),
            participant_count: 2,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    pub fn tag(name: &str, is_active: bool) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            description: None,
            is_active,
            post_count: 0,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    pub fn topic(name: &str, is_active: bool) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            description: None,
            is_active,
            post_count: 0,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    pub fn permission(resource: &str, action: &str) -> Permission {
        Permission {
            id: Uuid::new_v4(),
            resource: resource.to_string(),
            action: action.to_string(),
            description: None,
        }
    }

    pub fn role(name: &str, is_system_role: bool) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            description: None,
            priority: if is_system_role { 100 } else { 10 },
            is_system_role,
            permissions: Vec::new(),
        }
    }

    pub fn submission() -> Submission {
        Submission {
            id: Uuid::new_v4(),
            contest_id: None,
            problem_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            language: "cpp".to_string(),
            status: SubmissionStatus::Accepted,
            score: Some(100),
            execution_time_ms: Some(12),
            memory_usage_kb: Some(2048),
            submitted_at: timestamp(),
        }
    }

    pub fn leaderboard_entry(rank: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            user_id: Uuid::new_v4(),
            username: format!("user{rank}"),
            display_name: None,
            score: 1000 - i64::from(rank) * 100,
            penalty: i64::from(rank) * 10,
            problems_solved: 3,
            problem_results: Vec::new(),
            last_accepted_at: None,
        }
    }

    pub fn participant(user_id: UserId) -> ParticipantDetail {
        ParticipantDetail {
            user_id,
            username: "alice".to_string(),
            display_name: Some("Alice".to_string()),
            rank: Some(1),
            score: 900,
            penalty: 10,
            problems_solved: 3,
            problem_results: Vec::new(),
            registered_at: timestamp(),
        }
    }
}
