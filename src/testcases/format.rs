//! Name/MIME checks for uploaded test-case files.

use std::path::Path;

use crate::constants::{testcase_extensions, testcase_mime_types};

use super::{TestcaseFile, TestcaseFileError};

/// Recognised test-case file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestcaseFormat {
    Txt,
    Json,
}

impl TestcaseFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => testcase_extensions::TXT,
            Self::Json => testcase_extensions::JSON,
        }
    }

    fn accepted_mime_types(&self) -> &'static [&'static str] {
        match self {
            Self::Txt => testcase_mime_types::TXT,
            Self::Json => testcase_mime_types::JSON,
        }
    }

    /// MIME type sent with the upload
    pub fn canonical_mime(&self) -> &'static str {
        self.accepted_mime_types()[0]
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            testcase_extensions::TXT => Some(Self::Txt),
            testcase_extensions::JSON => Some(Self::Json),
            _ => None,
        }
    }
}

/// Check a file's extension and MIME type against `allowed`.
///
/// Browsers frequently report an empty or generic MIME type, so a missing or
/// `application/octet-stream` type falls back to a guess from the file name.
pub fn validate_testcase_file_format(
    file: &TestcaseFile,
    allowed: &[TestcaseFormat],
) -> Result<TestcaseFormat, TestcaseFileError> {
    let extension = Path::new(&file.name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let format = TestcaseFormat::from_extension(&extension)
        .filter(|f| allowed.contains(f))
        .ok_or_else(|| {
            tracing::warn!(file = %file.name, "rejected test case file extension");
            TestcaseFileError::UnsupportedExtension {
                found: if extension.is_empty() { "(none)".to_string() } else { format!(".{extension}") },
                allowed: allowed
                    .iter()
                    .map(|f| format!(".{}", f.extension()))
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })?;

    let reported = file
        .mime_type
        .as_deref()
        .map(|m| m.split(';').next().unwrap_or(m).trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty() && m != "application/octet-stream");

    let mime = match reported {
        Some(mime) => mime,
        None => mime_guess::from_path(&file.name)
            .first_raw()
            .unwrap_or(format.canonical_mime())
            .to_string(),
    };

    if !format.accepted_mime_types().contains(&mime.as_str()) {
        tracing::warn!(file = %file.name, mime = %mime, "rejected test case file type");
        return Err(TestcaseFileError::UnsupportedMimeType(mime));
    }

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: Option<&str>) -> TestcaseFile {
        TestcaseFile::new(name, mime, Vec::new())
    }

    #[test]
    fn test_accepts_allowed_extensions() {
        let both = [TestcaseFormat::Txt, TestcaseFormat::Json];
        assert_eq!(
            validate_testcase_file_format(&file("a.txt", Some("text/plain")), &both),
            Ok(TestcaseFormat::Txt)
        );
        assert_eq!(
            validate_testcase_file_format(&file("A.JSON", None), &both),
            Ok(TestcaseFormat::Json)
        );
        assert_eq!(
            validate_testcase_file_format(
                &file("a.txt", Some("text/plain; charset=utf-8")),
                &both
            ),
            Ok(TestcaseFormat::Txt)
        );
    }

    #[test]
    fn test_rejects_extension_outside_call_site_allow_list() {
        let err = validate_testcase_file_format(&file("a.json", None), &[TestcaseFormat::Txt])
            .unwrap_err();
        assert_eq!(
            err,
            TestcaseFileError::UnsupportedExtension {
                found: ".json".to_string(),
                allowed: ".txt".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_missing_extension() {
        let err = validate_testcase_file_format(&file("testcases", None), &[TestcaseFormat::Txt])
            .unwrap_err();
        assert!(matches!(err, TestcaseFileError::UnsupportedExtension { found, .. } if found == "(none)"));
    }

    #[test]
    fn test_rejects_mismatched_mime() {
        let err = validate_testcase_file_format(
            &file("a.txt", Some("image/png")),
            &[TestcaseFormat::Txt],
        )
        .unwrap_err();
        assert_eq!(err, TestcaseFileError::UnsupportedMimeType("image/png".to_string()));
    }

    #[test]
    fn test_octet_stream_falls_back_to_guess() {
        assert_eq!(
            validate_testcase_file_format(
                &file("a.json", Some("application/octet-stream")),
                &[TestcaseFormat::Json]
            ),
            Ok(TestcaseFormat::Json)
        );
    }
}
