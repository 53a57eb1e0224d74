//! Judge Admin - Client-side logic of the online judge admin console
//!
//! This library holds everything the admin console decides on its own, leaving
//! rendering and HTTP transport to the host that embeds it.
//!
//! # Features
//!
//! - Multi-step problem wizard with per-step error flags and draft mirroring
//! - Contest form with dense problem ordering and batch scoring
//! - Test-case file acceptance (format check, then content check)
//! - Paginated tables with confirmation-gated row actions
//! - Infinite submission history
//! - Live leaderboard polling that pauses while searching
//!
//! # Architecture
//!
//! - **Services**: async traits for the REST collaborators (implemented by the host)
//! - **Forms / Listing / Leaderboard**: controllers driving each page
//! - **Drafts**: single-slot storage for in-progress create flows
//! - **Models**: wire types of the admin API

pub mod config;
pub mod constants;
pub mod drafts;
pub mod error;
pub mod forms;
pub mod leaderboard;
pub mod listing;
pub mod models;
pub mod notify;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod testcases;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use config::AdminConfig;
pub use error::{AdminError, AdminResult};
pub use state::AdminState;
