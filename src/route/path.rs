//! Route path normalization.
//!
//! Route keys are stored and looked up in one canonical form:
//! - always starts with `/`
//! - no trailing `/` (except the root itself)
//! - no query string or fragment

/// Normalize a route path to its canonical form.
///
/// ```ignore
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("changelog/"), "/changelog");
/// assert_eq!(normalize("/activate?token=abc"), "/activate");
/// ```
pub fn normalize(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        return "/".to_string();
    }

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Check if a normalized route is the site root.
#[inline]
pub fn is_root(route: &str) -> bool {
    route == "/"
}

/// Check that every segment of a normalized route is a real name.
///
/// Empty (`//`), `.` and `..` segments are rejected: such routes would
/// produce doubled slashes in canonical URLs or write outside the output
/// directory.
pub fn has_plain_segments(route: &str) -> bool {
    is_root(route)
        || route
            .strip_prefix('/')
            .is_some_and(|rest| rest.split('/').all(|s| !s.is_empty() && s != "." && s != ".."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_root_variants() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("//"), "/");
        assert_eq!(normalize("  "), "/");
    }

    #[test]
    fn test_normalize_adds_leading_slash() {
        assert_eq!(normalize("changelog"), "/changelog");
    }

    #[test]
    fn test_normalize_strips_trailing_slash() {
        assert_eq!(normalize("/changelog/"), "/changelog");
        assert_eq!(normalize("/legal/privacy/"), "/legal/privacy");
    }

    #[test]
    fn test_normalize_strips_query_and_fragment() {
        assert_eq!(normalize("/activate?token=abc"), "/activate");
        assert_eq!(normalize("/changelog#v1.2"), "/changelog");
        assert_eq!(normalize("/?ref=hn"), "/");
    }

    #[test]
    fn test_has_plain_segments() {
        assert!(has_plain_segments("/"));
        assert!(has_plain_segments("/changelog"));
        assert!(has_plain_segments("/legal/privacy-policy"));
        assert!(has_plain_segments("/v1.2"));

        assert!(!has_plain_segments(&normalize("//changelog")));
        assert!(!has_plain_segments(&normalize("/legal//privacy")));
        assert!(!has_plain_segments(&normalize("/../escape")));
        assert!(!has_plain_segments(&normalize("/docs/./setup")));
        assert!(!has_plain_segments(&normalize("/docs/..")));
    }

    #[test]
    fn test_is_root() {
        assert!(is_root("/"));
        assert!(!is_root("/changelog"));
    }
}
