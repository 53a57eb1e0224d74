//! Structural checks on test-case file content.
//!
//! The layout follows the file's format. JSON: an array of `{input, output}`
//! records, or an object whose `testcases` field holds that array. Text: records
//! separated by a line `===`, each record split into input and expected output
//! by a line `---`.

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::constants::{TEXT_OUTPUT_SEPARATOR, TEXT_RECORD_SEPARATOR};

use super::{TestcaseFileError, TestcaseFormat};

/// Result of a successful content check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestcaseSummary {
    pub testcase_count: usize,
}

#[derive(Deserialize)]
struct JsonRecord {
    input: String,
    #[serde(rename = "output", alias = "expectedOutput")]
    _output: IgnoredAny,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTestcases {
    List(Vec<JsonRecord>),
    Wrapped { testcases: Vec<JsonRecord> },
}

/// Parse `text` in the layout of `format` and check it holds between 1 and
/// `max_count` well-formed records
pub fn validate_testcase_file_content(
    text: &str,
    format: TestcaseFormat,
    max_count: usize,
) -> Result<TestcaseSummary, TestcaseFileError> {
    if text.trim().is_empty() {
        return Err(TestcaseFileError::Empty);
    }

    let count = match format {
        TestcaseFormat::Json => count_json_records(text)?,
        TestcaseFormat::Txt => count_text_records(text)?,
    };

    if count == 0 {
        return Err(TestcaseFileError::NoTestcases);
    }
    if count > max_count {
        return Err(TestcaseFileError::TooMany {
            count,
            max: max_count,
        });
    }

    Ok(TestcaseSummary {
        testcase_count: count,
    })
}

fn count_json_records(text: &str) -> Result<usize, TestcaseFileError> {
    let parsed: JsonTestcases =
        serde_json::from_str(text).map_err(|e| TestcaseFileError::Malformed {
            record: None,
            reason: e.to_string(),
        })?;

    let records = match parsed {
        JsonTestcases::List(records) => records,
        JsonTestcases::Wrapped { testcases } => testcases,
    };

    if let Some(index) = records.iter().position(|r| r.input.trim().is_empty()) {
        return Err(empty_input(index + 1));
    }
    Ok(records.len())
}

fn count_text_records(text: &str) -> Result<usize, TestcaseFileError> {
    let mut count = 0;
    let mut block: Vec<&str> = Vec::new();
    let mut index = 0;

    for line in text.lines().chain(std::iter::once(TEXT_RECORD_SEPARATOR)) {
        if line.trim_end() == TEXT_RECORD_SEPARATOR {
            if block.iter().any(|l| !l.trim().is_empty()) {
                index += 1;
                check_text_record(&block, index)?;
                count += 1;
            }
            block.clear();
        } else {
            block.push(line);
        }
    }

    Ok(count)
}

fn empty_input(record: usize) -> TestcaseFileError {
    TestcaseFileError::Malformed {
        record: Some(record),
        reason: "input is empty".to_string(),
    }
}

fn check_text_record(lines: &[&str], index: usize) -> Result<(), TestcaseFileError> {
    let separators = lines
        .iter()
        .filter(|l| l.trim_end() == TEXT_OUTPUT_SEPARATOR)
        .count();

    match separators {
        1 => {
            let input_is_blank = lines
                .iter()
                .take_while(|l| l.trim_end() != TEXT_OUTPUT_SEPARATOR)
                .all(|l| l.trim().is_empty());
            if input_is_blank {
                Err(empty_input(index))
            } else {
                Ok(())
            }
        }
        0 => Err(TestcaseFileError::Malformed {
            record: Some(index),
            reason: format!("missing '{TEXT_OUTPUT_SEPARATOR}' separator"),
        }),
        _ => Err(TestcaseFileError::Malformed {
            record: Some(index),
            reason: format!("more than one '{TEXT_OUTPUT_SEPARATOR}' separator"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_is_invalid() {
        assert_eq!(
            validate_testcase_file_content("", TestcaseFormat::Txt, 10),
            Err(TestcaseFileError::Empty)
        );
        assert_eq!(
            validate_testcase_file_content("  \n\t\n", TestcaseFormat::Json, 10),
            Err(TestcaseFileError::Empty)
        );
    }

    #[test]
    fn test_text_records() {
        let text = "1 2\n---\n3\n===\n5 5\n---\n10\n";
        assert_eq!(
            validate_testcase_file_content(text, TestcaseFormat::Txt, 10),
            Ok(TestcaseSummary { testcase_count: 2 })
        );
    }

    #[test]
    fn test_text_trailing_separator_is_ignored() {
        let text = "1\n---\n1\n===\n\n===\n";
        assert_eq!(
            validate_testcase_file_content(text, TestcaseFormat::Txt, 10).unwrap().testcase_count,
            1
        );
    }

    #[test]
    fn test_text_record_without_output_separator() {
        let text = "1\n---\n1\n===\n2\n2\n";
        assert_eq!(
            validate_testcase_file_content(text, TestcaseFormat::Txt, 10),
            Err(TestcaseFileError::Malformed {
                record: Some(2),
                reason: "missing '---' separator".to_string(),
            })
        );
    }

    #[test]
    fn test_json_layouts() {
        let list = r#"[{"input":"1","output":"1"}]"#;
        assert_eq!(validate_testcase_file_content(list, TestcaseFormat::Json, 10).unwrap().testcase_count, 1);

        let wrapped = r#"{"testcases":[{"input":"1","expectedOutput":"1"},{"input":"2","output":"4"}]}"#;
        assert_eq!(
            validate_testcase_file_content(wrapped, TestcaseFormat::Json, 10).unwrap().testcase_count,
            2
        );
    }

    #[test]
    fn test_json_without_records() {
        assert_eq!(
            validate_testcase_file_content("[]", TestcaseFormat::Json, 10),
            Err(TestcaseFileError::NoTestcases)
        );
    }

    #[test]
    fn test_malformed_json() {
        let result = validate_testcase_file_content(r#"[{"input":"1"}]"#, TestcaseFormat::Json, 10);
        assert!(matches!(result, Err(TestcaseFileError::Malformed { record: None, .. })));
    }

    #[test]
    fn test_count_cap() {
        let text = "1\n---\n1\n===\n2\n---\n2\n===\n3\n---\n3";
        assert_eq!(
            validate_testcase_file_content(text, TestcaseFormat::Txt, 2),
            Err(TestcaseFileError::TooMany { count: 3, max: 2 })
        );
    }

    #[test]
    fn test_text_inputs_may_look_like_json() {
        let text = "[1, 2, 3]\n---\n6\n===\n[4]\n---\n4\n";
        assert_eq!(
            validate_testcase_file_content(text, TestcaseFormat::Txt, 10),
            Ok(TestcaseSummary { testcase_count: 2 })
        );

        let text = "{\"n\": 1}\n---\n1\n";
        assert_eq!(
            validate_testcase_file_content(text, TestcaseFormat::Txt, 10)
                .unwrap()
                .testcase_count,
            1
        );
    }

    #[test]
    fn test_json_file_is_not_read_as_text() {
        let text = "1\n---\n1\n";
        assert!(matches!(
            validate_testcase_file_content(text, TestcaseFormat::Json, 10),
            Err(TestcaseFileError::Malformed { record: None, .. })
        ));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let json = r#"[{"input":"1","output":"1"},{"input":"  ","output":"0"}]"#;
        assert_eq!(
            validate_testcase_file_content(json, TestcaseFormat::Json, 10),
            Err(TestcaseFileError::Malformed {
                record: Some(2),
                reason: "input is empty".to_string(),
            })
        );

        let text = "\n---\n1\n";
        assert_eq!(
            validate_testcase_file_content(text, TestcaseFormat::Txt, 10),
            Err(TestcaseFileError::Malformed {
                record: Some(1),
                reason: "input is empty".to_string(),
            })
        );
    }
}
