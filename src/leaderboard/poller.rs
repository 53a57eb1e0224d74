//! Live leaderboard polling.
//!
//! The poller is Polling only while the contest is running and no search
//! keyword is set. Any change of contest, status, keyword or page cancels the
//! running timer before a new one is started, and bumps a generation counter so
//! that a response already in flight for the old inputs is never applied.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::leaderboard::task::ScheduledTask;
use crate::listing::query::LeaderboardQuery;
use crate::models::{ContestId, ContestStatus, LeaderboardEntry, PageMeta, Paginated};
use crate::notify::{Notifier, Toast};
use crate::services::ContestsService;
use crate::utils::time::now_utc;

/// Poller state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Paused,
}

/// Everything the polling schedule depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollInputs {
    pub contest_id: ContestId,
    pub status: ContestStatus,
    pub keyword: String,
    pub page: u32,
}

impl PollInputs {
    /// State the poller should be in for these inputs
    pub fn target_state(&self) -> PollerState {
        if self.status.is_live() && self.keyword.trim().is_empty() {
            PollerState::Polling
        } else {
            PollerState::Paused
        }
    }
}

/// Latest leaderboard page as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardSnapshot {
    pub entries: Vec<LeaderboardEntry>,
    pub meta: PageMeta,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Number of pages applied by the poller
    pub background_refreshes: u64,
    /// A foreground fetch (search, paging) is in flight. Background refreshes
    /// never set this.
    pub loading: bool,
}

impl LeaderboardSnapshot {
    pub fn empty(limit: u32) -> Self {
        Self {
            entries: Vec::new(),
            meta: PageMeta::empty(limit),
            refreshed_at: None,
            background_refreshes: 0,
            loading: false,
        }
    }

    pub(crate) fn apply(&mut self, page: Paginated<LeaderboardEntry>, background: bool) {
        self.entries = page.data;
        self.meta = page.meta;
        self.refreshed_at = Some(now_utc());
        if background {
            self.background_refreshes += 1;
        } else {
            self.loading = false;
        }
    }
}

pub type SharedBoard = Arc<watch::Sender<LeaderboardSnapshot>>;

pub struct LeaderboardPoller {
    contests: Arc<dyn ContestsService>,
    notifier: Arc<dyn Notifier>,
    board: SharedBoard,
    generation: Arc<AtomicU64>,
    interval: Duration,
    page_size: u32,
    inputs: Option<PollInputs>,
    state: PollerState,
    task: ScheduledTask,
}

impl LeaderboardPoller {
    pub fn new(
        contests: Arc<dyn ContestsService>,
        notifier: Arc<dyn Notifier>,
        board: SharedBoard,
        interval: Duration,
        page_size: u32,
    ) -> Self {
        Self {
            contests,
            notifier,
            board,
            generation: Arc::new(AtomicU64::new(0)),
            interval,
            page_size,
            inputs: None,
            state: PollerState::Idle,
            task: ScheduledTask::new(),
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    /// Bumped on every input change or stop
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// React to new inputs. Identical inputs leave the running timer alone.
    pub fn update(&mut self, inputs: PollInputs) -> PollerState {
        if self.inputs.as_ref() == Some(&inputs) && self.state != PollerState::Idle {
            return self.state;
        }

        self.task.stop();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let next = inputs.target_state();

        if next == PollerState::Polling {
            self.start_polling(&inputs, generation);
        }

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, contest_id = %inputs.contest_id, "leaderboard poller transition");
        }
        self.state = next;
        self.inputs = Some(inputs);
        self.state
    }

    /// Stop polling for good (view closed)
    pub fn stop(&mut self) {
        self.task.stop();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if self.state != PollerState::Idle {
            tracing::debug!(from = ?self.state, "leaderboard poller stopped");
        }
        self.state = PollerState::Idle;
        self.inputs = None;
    }

    fn start_polling(&mut self, inputs: &PollInputs, generation: u64) {
        let contests = self.contests.clone();
        let notifier = self.notifier.clone();
        let board = self.board.clone();
        let current = self.generation.clone();
        let failures = Arc::new(AtomicUsize::new(0));
        let contest_id = inputs.contest_id;
        let query = LeaderboardQuery {
            page: inputs.page,
            limit: self.page_size,
            keyword: String::new(),
        };

        self.task.start(self.interval, move || {
            let contests = contests.clone();
            let notifier = notifier.clone();
            let board = board.clone();
            let current = current.clone();
            let failures = failures.clone();
            let query = query.clone();

            async move {
                match contests.leaderboard(contest_id, &query).await {
                    Ok(page) => {
                        if current.load(Ordering::SeqCst) != generation {
                            tracing::debug!(%contest_id, "discarding leaderboard page for stale inputs");
                            return;
                        }
                        board.send_modify(|snapshot| snapshot.apply(page, true));
                        failures.store(0, Ordering::SeqCst);
                    }
                    Err(e) => {
                        tracing::warn!(%contest_id, "leaderboard refresh failed: {}", e);
                        // One toast per run of failures
                        if failures.fetch_add(1, Ordering::SeqCst) == 0 {
                            notifier.notify(Toast::warning("Live leaderboard refresh failed"));
                        }
                    }
                }
            }
        });
    }
}

impl Drop for LeaderboardPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::MockContestsService;
    use crate::test_utils::{fixtures, RecordingNotifier};
    use uuid::Uuid;

    fn inputs(contest_id: ContestId, status: ContestStatus, keyword: &str) -> PollInputs {
        PollInputs {
            contest_id,
            status,
            keyword: keyword.to_string(),
            page: 1,
        }
    }

    fn counting_mock(fetches: &Arc<AtomicUsize>) -> MockContestsService {
        let counter = fetches.clone();
        let mut mock = MockContestsService::new();
        mock.expect_leaderboard().returning(move |_, q| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Paginated::new(vec![fixtures::leaderboard_entry(1)], q.page, q.limit, 1))
        });
        mock
    }

    fn poller(mock: MockContestsService) -> (LeaderboardPoller, SharedBoard, Arc<RecordingNotifier>) {
        let board: SharedBoard = Arc::new(watch::channel(LeaderboardSnapshot::empty(50)).0);
        let notifier = Arc::new(RecordingNotifier::default());
        let poller = LeaderboardPoller::new(
            Arc::new(mock),
            notifier.clone(),
            board.clone(),
            Duration::from_secs(5),
            50,
        );
        (poller, board, notifier)
    }

    #[test]
    fn test_target_state() {
        let id = Uuid::new_v4();
        assert_eq!(inputs(id, ContestStatus::Ongoing, "").target_state(), PollerState::Polling);
        assert_eq!(inputs(id, ContestStatus::Ongoing, "al").target_state(), PollerState::Paused);
        assert_eq!(inputs(id, ContestStatus::Ended, "").target_state(), PollerState::Paused);
        assert_eq!(inputs(id, ContestStatus::Upcoming, " ").target_state(), PollerState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_fetch_per_interval_until_keyword() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let (mut poller, board, _) = poller(counting_mock(&fetches));
        let id = Uuid::new_v4();

        assert_eq!(poller.update(inputs(id, ContestStatus::Ongoing, "")), PollerState::Polling);
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(board.borrow().background_refreshes, 2);

        assert_eq!(poller.update(inputs(id, ContestStatus::Ongoing, "alice")), PollerState::Paused);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);

        assert_eq!(poller.update(inputs(id, ContestStatus::Ongoing, "")), PollerState::Polling);
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_inputs_keep_timer() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let (mut poller, _, _) = poller(counting_mock(&fetches));
        let id = Uuid::new_v4();

        poller.update(inputs(id, ContestStatus::Ongoing, ""));
        let generation = poller.generation();
        tokio::time::sleep(Duration::from_secs(3)).await;
        poller.update(inputs(id, ContestStatus::Ongoing, ""));
        assert_eq!(poller.generation(), generation);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_restarts_timer() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let (mut poller, _, _) = poller(counting_mock(&fetches));
        let id = Uuid::new_v4();

        poller.update(inputs(id, ContestStatus::Ongoing, ""));
        tokio::time::sleep(Duration::from_secs(4)).await;
        let mut next_page = inputs(id, ContestStatus::Ongoing, "");
        next_page.page = 2;
        poller.update(next_page);

        // The old timer would have fired at t=5s
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_contest_end_and_stop_pause_polling() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let (mut poller, _, _) = poller(counting_mock(&fetches));
        let id = Uuid::new_v4();

        poller.update(inputs(id, ContestStatus::Ongoing, ""));
        assert_eq!(poller.update(inputs(id, ContestStatus::Ended, "")), PollerState::Paused);
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);

        poller.update(inputs(id, ContestStatus::Ongoing, ""));
        poller.stop();
        assert_eq!(poller.state(), PollerState::Idle);
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_failures_toast_once() {
        let mut mock = MockContestsService::new();
        mock.expect_leaderboard()
            .returning(|_, _| Err(ServiceError::Network("down".to_string())));
        let (mut poller, board, notifier) = poller(mock);

        poller.update(inputs(Uuid::new_v4(), ContestStatus::Ongoing, ""));
        tokio::time::sleep(Duration::from_millis(15_500)).await;
        assert_eq!(notifier.count(), 1);
        assert_eq!(board.borrow().background_refreshes, 0);
    }
}
