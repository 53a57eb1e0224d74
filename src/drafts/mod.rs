//! In-progress form state kept across navigation.

pub mod store;

pub use store::{load_draft, save_draft, DraftKind, DraftRepository, DraftStore};
