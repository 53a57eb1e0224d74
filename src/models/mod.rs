//! Domain models
//!
//! Wire types exchanged with the REST collaborators. Field names follow the
//! camelCase JSON contract of the admin API.

pub mod contest;
pub mod leaderboard;
pub mod pagination;
pub mod problem;
pub mod role;
pub mod submission;
pub mod tag;
pub mod topic;

pub use contest::*;
pub use leaderboard::*;
pub use pagination::*;
pub use problem::*;
pub use role::*;
pub use submission::*;
pub use tag::*;
pub use topic::*;

use uuid::Uuid;

/// Tag ID type
pub type TagId = Uuid;

/// Topic ID type
pub type TopicId = Uuid;

/// Role ID type
pub type RoleId = Uuid;

/// Permission ID type
pub type PermissionId = Uuid;

/// Problem ID type
pub type ProblemId = Uuid;

/// Contest ID type
pub type ContestId = Uuid;

/// User ID type
pub type UserId = Uuid;

/// Submission ID type
pub type SubmissionId = Uuid;
