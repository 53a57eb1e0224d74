//! Append-only submission history with infinite scroll.
//!
//! At most one batch is in flight at a time. Changing the filter starts a new
//! generation; a batch that arrives for an older generation is dropped.

use std::sync::Arc;

use crate::error::{AdminError, AdminResult, ServiceResult};
use crate::listing::query::SubmissionQuery;
use crate::models::{ContestId, Paginated, ProblemId, Submission, UserId};
use crate::notify::{Notifier, Toast};
use crate::services::SubmissionsService;
use crate::state::AdminState;

/// Batch request handed out by [`SubmissionFeed::begin_load`]
#[derive(Debug, Clone)]
pub struct FeedTicket {
    generation: u64,
    pub query: SubmissionQuery,
}

pub struct SubmissionFeed {
    submissions: Arc<dyn SubmissionsService>,
    notifier: Arc<dyn Notifier>,
    contest_id: ContestId,
    user_id: Option<UserId>,
    problem_id: Option<ProblemId>,
    batch: u32,
    items: Vec<Submission>,
    has_more: bool,
    loading: bool,
    generation: u64,
}

impl SubmissionFeed {
    /// Feed of a contest's submissions, optionally narrowed to one participant
    pub fn new(state: &AdminState, contest_id: ContestId, user_id: Option<UserId>) -> Self {
        Self {
            submissions: state.submissions(),
            notifier: state.notifier(),
            contest_id,
            user_id,
            problem_id: None,
            batch: state.config().listing.submissions_batch,
            items: Vec::new(),
            has_more: true,
            loading: false,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[Submission] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Nothing left to load and nothing loaded
    pub fn is_empty(&self) -> bool {
        !self.has_more && self.items.is_empty()
    }

    /// Narrow the feed to one problem, restarting from the top
    pub fn set_problem_filter(&mut self, problem_id: Option<ProblemId>) {
        if self.problem_id != problem_id {
            self.problem_id = problem_id;
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.has_more = true;
        self.loading = false;
    }

    /// Claim the next batch. Returns `None` while a batch is in flight or the
    /// feed is exhausted.
    pub fn begin_load(&mut self) -> Option<FeedTicket> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;

        Some(FeedTicket {
            generation: self.generation,
            query: SubmissionQuery {
                contest_id: self.contest_id,
                user_id: self.user_id,
                problem_id: self.problem_id,
                offset: self.items.len() as u64,
                limit: self.batch,
            },
        })
    }

    /// Append a batch. Returns how many rows were added.
    pub fn finish_load(
        &mut self,
        ticket: FeedTicket,
        result: ServiceResult<Paginated<Submission>>,
    ) -> AdminResult<usize> {
        if ticket.generation != self.generation {
            tracing::debug!("dropping submissions batch for a previous filter");
            return Ok(0);
        }
        self.loading = false;

        match result {
            Ok(page) => {
                let added = page.data.len();
                self.items.extend(page.data);
                self.has_more = added > 0 && (self.items.len() as u64) < page.meta.total;
                tracing::debug!(added, total = page.meta.total, "submissions appended");
                Ok(added)
            }
            Err(e) => {
                let err = AdminError::from(e);
                tracing::error!(contest_id = %self.contest_id, "failed to load submissions: {}", err);
                self.notifier.notify(Toast::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Called when the scroll sentinel becomes visible
    pub async fn load_more(&mut self) -> AdminResult<usize> {
        let Some(ticket) = self.begin_load() else {
            return Ok(0);
        };
        let result = self.submissions.list(&ticket.query).await;
        self.finish_load(ticket, result)
    }
}
