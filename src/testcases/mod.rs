//! Test-case file acceptance
//!
//! A file is accepted into form state in two stages: the cheap format check on
//! its name and MIME type, then the content check on its decoded text. The
//! content is never read when the format check fails.

pub mod content;
pub mod format;

pub use content::{validate_testcase_file_content, TestcaseSummary};
pub use format::{validate_testcase_file_format, TestcaseFormat};

use crate::services::TestcaseUpload;

/// File picked by the user, before acceptance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestcaseFile {
    pub name: String,
    /// MIME type reported by the picker, if any
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl TestcaseFile {
    pub fn new(name: impl Into<String>, mime_type: Option<&str>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }
}

/// Why a test-case file was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestcaseFileError {
    #[error("Unsupported file extension '{found}', expected one of: {allowed}")]
    UnsupportedExtension { found: String, allowed: String },

    #[error("Unsupported file type '{0}'")]
    UnsupportedMimeType(String),

    #[error("File is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("File is empty")]
    Empty,

    #[error("Malformed test case file{}: {reason}", .record.map(|r| format!(" (record {r})")).unwrap_or_default())]
    Malformed { record: Option<usize>, reason: String },

    #[error("File contains no test cases")]
    NoTestcases,

    #[error("File contains {count} test cases, at most {max} are allowed")]
    TooMany { count: usize, max: usize },
}

/// Run both checks, calling `check_content` only when the format is acceptable.
/// The closure receives the decoded text and the format the name resolved to.
pub fn accept_testcase_file_with<F>(
    file: &TestcaseFile,
    allowed: &[TestcaseFormat],
    check_content: F,
) -> Result<TestcaseUpload, TestcaseFileError>
where
    F: FnOnce(&str, TestcaseFormat) -> Result<TestcaseSummary, TestcaseFileError>,
{
    let format = validate_testcase_file_format(file, allowed)?;

    let text = std::str::from_utf8(&file.bytes).map_err(|_| TestcaseFileError::InvalidEncoding)?;
    let summary = check_content(text, format)?;

    tracing::debug!(
        file = %file.name,
        count = summary.testcase_count,
        "accepted test case file"
    );

    Ok(TestcaseUpload {
        file_name: file.name.clone(),
        mime_type: format.canonical_mime().to_string(),
        bytes: file.bytes.clone(),
        testcase_count: summary.testcase_count,
    })
}

/// Format check followed by the standard content check
pub fn accept_testcase_file(
    file: &TestcaseFile,
    allowed: &[TestcaseFormat],
    max_count: usize,
) -> Result<TestcaseUpload, TestcaseFileError> {
    accept_testcase_file_with(file, allowed, |text, format| {
        validate_testcase_file_content(text, format, max_count)
    })
}
