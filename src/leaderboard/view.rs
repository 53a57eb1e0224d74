//! Contest leaderboard page.
//!
//! User-driven fetches (search, paging) publish `loading` on the board while
//! they are in flight; refreshes made by the poller update the board silently.
//! Keyword and page are only committed once their page has arrived, so a failed
//! fetch can be retried with the same arguments.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{AdminError, AdminResult};
use crate::leaderboard::participant::ParticipantView;
use crate::leaderboard::poller::{
    LeaderboardPoller, LeaderboardSnapshot, PollInputs, PollerState, SharedBoard,
};
use crate::listing::query::LeaderboardQuery;
use crate::models::{Contest, ContestId, ContestStatus, UserId};
use crate::notify::{Notifier, Toast};
use crate::services::ContestsService;
use crate::state::AdminState;

pub struct LeaderboardView {
    state: AdminState,
    contests: Arc<dyn ContestsService>,
    notifier: Arc<dyn Notifier>,
    contest: Contest,
    board: SharedBoard,
    poller: LeaderboardPoller,
    keyword: String,
    page: u32,
    page_size: u32,
}

impl LeaderboardView {
    /// Load the contest and its first leaderboard page, then start polling
    /// if the contest is running.
    pub async fn open(state: &AdminState, contest_id: ContestId) -> AdminResult<Self> {
        let contests = state.contests();
        let notifier = state.notifier();
        let config = &state.config().leaderboard;

        let query = LeaderboardQuery {
            page: 1,
            limit: config.page_size,
            keyword: String::new(),
        };
        let loaded = futures::try_join!(
            contests.get(contest_id),
            contests.leaderboard(contest_id, &query)
        );
        let (contest, page) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                let err = AdminError::from(e);
                tracing::error!(%contest_id, "failed to open leaderboard: {}", err);
                notifier.notify(Toast::error(err.user_message()));
                return Err(err);
            }
        };

        let mut snapshot = LeaderboardSnapshot::empty(config.page_size);
        snapshot.apply(page, false);
        let board: SharedBoard = Arc::new(watch::channel(snapshot).0);

        let poller = LeaderboardPoller::new(
            contests.clone(),
            notifier.clone(),
            board.clone(),
            config.poll_interval,
            config.page_size,
        );

        let mut view = Self {
            state: state.clone(),
            contests,
            notifier,
            contest,
            board,
            poller,
            keyword: String::new(),
            page: 1,
            page_size: config.page_size,
        };
        view.sync_poller();
        tracing::info!(%contest_id, status = %view.contest.status, "leaderboard opened");
        Ok(view)
    }

    pub fn contest(&self) -> &Contest {
        &self.contest
    }

    pub fn is_loading(&self) -> bool {
        self.board.borrow().loading
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn poller_state(&self) -> PollerState {
        self.poller.state()
    }

    pub fn snapshot(&self) -> LeaderboardSnapshot {
        self.board.borrow().clone()
    }

    /// Receiver that sees every page applied, foreground or background
    pub fn subscribe(&self) -> watch::Receiver<LeaderboardSnapshot> {
        self.board.subscribe()
    }

    /// Search participants. Polling pauses while the keyword is non-empty.
    pub async fn search(&mut self, keyword: &str) -> AdminResult<()> {
        let keyword = keyword.trim().to_string();
        if keyword == self.keyword {
            return Ok(());
        }
        self.fetch(keyword, 1).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> AdminResult<()> {
        let page = page.max(1);
        if page == self.page {
            return Ok(());
        }
        self.fetch(self.keyword.clone(), page).await
    }

    /// Re-read the contest, e.g. after it started or ended
    pub async fn reload_contest(&mut self) -> AdminResult<()> {
        match self.contests.get(self.contest.id).await {
            Ok(contest) => {
                self.contest = contest;
                self.sync_poller();
                Ok(())
            }
            Err(e) => {
                let err = AdminError::from(e);
                tracing::error!(contest_id = %self.contest.id, "failed to reload contest: {}", err);
                self.notifier.notify(Toast::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Apply a status change pushed by the host
    pub fn set_contest_status(&mut self, status: ContestStatus) {
        self.contest.status = status;
        self.sync_poller();
    }

    /// Open the detail panel of one participant
    pub async fn participant(&self, user_id: UserId) -> AdminResult<ParticipantView> {
        ParticipantView::open(&self.state, self.contest.id, user_id).await
    }

    /// Leave the page
    pub fn close(mut self) {
        self.poller.stop();
    }

    fn poll_inputs(&self, keyword: &str, page: u32) -> PollInputs {
        PollInputs {
            contest_id: self.contest.id,
            status: self.contest.status,
            keyword: keyword.to_string(),
            page,
        }
    }

    fn sync_poller(&mut self) -> PollerState {
        let inputs = self.poll_inputs(&self.keyword, self.page);
        self.poller.update(inputs)
    }

    async fn fetch(&mut self, keyword: String, page: u32) -> AdminResult<()> {
        // Retire the old timer first so its responses cannot overwrite this one
        let inputs = self.poll_inputs(&keyword, page);
        self.poller.update(inputs);
        self.board.send_modify(|snapshot| snapshot.loading = true);

        let query = LeaderboardQuery {
            page,
            limit: self.page_size,
            keyword: keyword.clone(),
        };

        match self.contests.leaderboard(self.contest.id, &query).await {
            Ok(rows) => {
                self.keyword = keyword;
                self.page = page;
                self.board.send_modify(|snapshot| snapshot.apply(rows, false));
                Ok(())
            }
            Err(e) => {
                self.board.send_modify(|snapshot| snapshot.loading = false);
                // Back to the schedule of the page still on screen
                self.sync_poller();

                let err = AdminError::from(e);
                tracing::error!(contest_id = %self.contest.id, %page, "failed to load leaderboard: {}", err);
                self.notifier.notify(Toast::error(err.user_message()));
                Err(err)
            }
        }
    }
}
