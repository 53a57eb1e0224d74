//! Application-wide constants
//!
//! This module contains all constant values used throughout the console.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// LISTING DEFAULTS
// =============================================================================

/// Default number of rows per page in Tags/Topics/Roles/Problems tables
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a table may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default number of submissions appended per infinite-scroll batch
pub const DEFAULT_SUBMISSIONS_BATCH: u32 = 20;

// =============================================================================
// LEADERBOARD DEFAULTS
// =============================================================================

/// Default leaderboard polling cadence in seconds
pub const DEFAULT_LEADERBOARD_POLL_SECS: u64 = 5;

/// Default number of leaderboard rows per page
pub const DEFAULT_LEADERBOARD_PAGE_SIZE: u32 = 50;

// =============================================================================
// PROBLEM LIMITS
// =============================================================================

/// Maximum problem title length
pub const MAX_PROBLEM_TITLE_LENGTH: u64 = 255;

/// Maximum problem description length
pub const MAX_PROBLEM_DESCRIPTION_LENGTH: u64 = 65536;

/// Time limit bounds in milliseconds
pub const MIN_TIME_LIMIT_MS: u32 = 100;
pub const MAX_TIME_LIMIT_MS: u32 = 30_000;

/// Memory limit bounds in megabytes
pub const MIN_MEMORY_LIMIT_MB: u32 = 16;
pub const MAX_MEMORY_LIMIT_MB: u32 = 1024;

/// Max score bounds
pub const MIN_MAX_SCORE: u32 = 1;
pub const MAX_MAX_SCORE: u32 = 10_000;

// =============================================================================
// CONTEST LIMITS
// =============================================================================

/// Maximum contest title length
pub const MAX_CONTEST_TITLE_LENGTH: u64 = 255;

/// Maximum contest description length
pub const MAX_CONTEST_DESCRIPTION_LENGTH: u64 = 10_000;

/// Longest contest accepted by the form (30 days)
pub const MAX_CONTEST_DURATION_MINUTES: i64 = 43_200;

// =============================================================================
// TAXONOMY LIMITS
// =============================================================================

/// Tag/Topic/Role name bounds
pub const MIN_NAME_LENGTH: u64 = 1;
pub const MAX_NAME_LENGTH: u64 = 100;

/// Tag/Topic/Role description bound
pub const MAX_TAXONOMY_DESCRIPTION_LENGTH: u64 = 500;

// =============================================================================
// TEST CASE FILES
// =============================================================================

/// Default cap on the number of records in a test-case file
pub const DEFAULT_TESTCASE_MAX_COUNT: usize = 1000;

/// Line separating two test-case records in a text file
pub const TEXT_RECORD_SEPARATOR: &str = "===";

/// Line separating input from expected output inside a text record
pub const TEXT_OUTPUT_SEPARATOR: &str = "---";

/// Accepted test-case file extensions
pub mod testcase_extensions {
    pub const TXT: &str = "txt";
    pub const JSON: &str = "json";
}

/// MIME types accepted alongside each extension
pub mod testcase_mime_types {
    pub const TXT: &[&str] = &["text/plain"];
    pub const JSON: &[&str] = &["application/json", "text/json"];
}
