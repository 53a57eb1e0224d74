//! REST collaborators
//!
//! The console talks to the judge backend only through these traits. Transport,
//! authentication and JSON decoding live in the host's implementations; every
//! method maps to one endpoint and returns the decoded payload.

pub mod contests;
pub mod problems;
pub mod roles;
pub mod submissions;
pub mod tags;
pub mod topics;

pub use contests::ContestsService;
pub use problems::{ProblemsService, TestcaseUpload};
pub use roles::RolesService;
pub use submissions::SubmissionsService;
pub use tags::TagsService;
pub use topics::TopicsService;

#[cfg(test)]
pub use contests::MockContestsService;
#[cfg(test)]
pub use problems::MockProblemsService;
#[cfg(test)]
pub use roles::MockRolesService;
#[cfg(test)]
pub use submissions::MockSubmissionsService;
#[cfg(test)]
pub use tags::MockTagsService;
#[cfg(test)]
pub use topics::MockTopicsService;
