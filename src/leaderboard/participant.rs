//! Participant detail panel: standing plus submission history.

use crate::error::{AdminError, AdminResult};
use crate::listing::feed::SubmissionFeed;
use crate::models::{ContestId, ParticipantDetail, UserId};
use crate::notify::Toast;
use crate::state::AdminState;

pub struct ParticipantView {
    pub detail: ParticipantDetail,
    pub submissions: SubmissionFeed,
}

impl ParticipantView {
    /// Load the standing and the first batch of submissions together
    pub async fn open(
        state: &AdminState,
        contest_id: ContestId,
        user_id: UserId,
    ) -> AdminResult<Self> {
        let contests = state.contests();
        let mut submissions = SubmissionFeed::new(state, contest_id, Some(user_id));

        let (detail, first_batch) = futures::join!(
            contests.participant(contest_id, user_id),
            submissions.load_more()
        );

        let detail = detail.map_err(|e| {
            let err = AdminError::from(e);
            tracing::error!(%contest_id, %user_id, "failed to load participant: {}", err);
            state.notifier().notify(Toast::error(err.user_message()));
            err
        })?;
        // The feed already reported its own failure and stays retryable
        if let Err(e) = first_batch {
            tracing::debug!(%user_id, "participant opened without submissions: {}", e);
        }

        Ok(Self {
            detail,
            submissions,
        })
    }
}
