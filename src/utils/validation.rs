//! Input normalisation utilities

use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

static SLUG_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug format regex"));

/// Derive a URL slug from a display name.
///
/// Lowercases, collapses every run of non-alphanumeric characters into one
/// hyphen and trims hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Check that an explicit slug is already in canonical form
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_FORMAT.is_match(slug)
}

/// `validator` adapter for optional slug fields
pub fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("invalid_slug");
        err.message = Some("Slug may only contain lowercase letters, digits and single hyphens".into());
        Err(err)
    }
}

/// `validator` adapter rejecting whitespace-only input
pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("This field is required".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitize an optional field, mapping blank input to `None`
pub fn sanitize_optional(input: Option<&str>) -> Option<String> {
    input.map(sanitize_string).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Graphs"), "graphs");
        assert_eq!(slugify("Dynamic Programming"), "dynamic-programming");
        assert_eq!(slugify("  C++ / STL  "), "c-stl");
        assert_eq!(slugify("Super   Admin!!"), "super-admin");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_validate_slug() {
        assert!(is_valid_slug("graphs"));
        assert!(is_valid_slug("number-theory-2"));
        assert!(!is_valid_slug("Graphs"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
        assert!(validate_slug("bad slug").is_err());
        assert!(validate_not_blank(" \t").is_err());
        assert!(validate_not_blank(" x").is_ok());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  hello\u{0007} "), "hello");
        assert_eq!(sanitize_optional(Some("   ")), None);
        assert_eq!(sanitize_optional(Some(" x ")), Some("x".to_string()));
    }
}
