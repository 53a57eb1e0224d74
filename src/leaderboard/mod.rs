//! Contest leaderboard: live polling, search and participant detail.

pub mod participant;
pub mod poller;
pub mod task;
pub mod view;

pub use participant::ParticipantView;
pub use poller::{LeaderboardPoller, LeaderboardSnapshot, PollInputs, PollerState, SharedBoard};
pub use task::ScheduledTask;
pub use view::LeaderboardView;
