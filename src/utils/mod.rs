//! Utility functions

pub mod time;
pub mod validation;

pub use time::{end_time_from_duration, minutes_between, now_utc};
pub use validation::{sanitize_string, slugify};
