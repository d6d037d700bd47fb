//! Redirect target validation against the product origin allow-list.
//!
//! Every browser redirect this service emits goes through [`safe_redirect`]
//! first. A rejected target is treated as "no redirect requested" by callers,
//! never surfaced as an error.

use url::Url;

/// Validate a candidate redirect target.
///
/// Accepts the candidate unchanged when it is a same-origin relative path, or
/// an absolute URL whose origin is the application's own origin or present in
/// the allow-list. Everything else, including unparseable input, is rejected.
///
/// `/`-prefixed candidates are still resolved against the self origin before
/// acceptance so scheme-relative `//host/...` input cannot escape the origin
/// check.
///
/// Note this only blocks cross-origin leakage: any same-origin path is
/// accepted, so callers must not rely on it to gate sensitive same-origin
/// routes.
#[must_use]
pub fn safe_redirect(
    candidate: Option<&str>,
    allow_list: &[String],
    self_origin: &str,
) -> Option<String> {
    let candidate = candidate.map(str::trim).filter(|target| !target.is_empty())?;

    // Missing or invalid self-origin configuration fails closed.
    let base = Url::parse(self_origin).ok()?;
    let base_origin = base.origin().ascii_serialization();

    let resolved = if candidate.starts_with('/') {
        base.join(candidate).ok()?
    } else {
        Url::parse(candidate).ok()?
    };
    let origin = resolved.origin().ascii_serialization();

    if origin == base_origin || allow_list.iter().any(|allowed| trimmed(allowed) == origin) {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Parse a comma-separated origin allow-list from configuration.
#[must_use]
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn trimmed(origin: &str) -> &str {
    origin.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> Vec<String> {
        vec!["https://products.example.com".to_string()]
    }

    const SELF_ORIGIN: &str = "https://auth.example.com";

    #[test]
    fn accepts_allow_listed_origin_unchanged() {
        assert_eq!(
            safe_redirect(Some("https://products.example.com/app"), &allow_list(), SELF_ORIGIN),
            Some("https://products.example.com/app".to_string())
        );
    }

    #[test]
    fn accepts_relative_path_unchanged() {
        assert_eq!(
            safe_redirect(Some("/dashboard"), &allow_list(), SELF_ORIGIN),
            Some("/dashboard".to_string())
        );
    }

    #[test]
    fn accepts_self_origin_absolute() {
        assert_eq!(
            safe_redirect(Some("https://auth.example.com/dashboard"), &allow_list(), SELF_ORIGIN),
            Some("https://auth.example.com/dashboard".to_string())
        );
    }

    #[test]
    fn rejects_unlisted_origin() {
        assert_eq!(
            safe_redirect(Some("https://evil.example.com/steal"), &allow_list(), SELF_ORIGIN),
            None
        );
    }

    #[test]
    fn rejects_scheme_relative_escape() {
        assert_eq!(
            safe_redirect(Some("//evil.example.com/steal"), &allow_list(), SELF_ORIGIN),
            None
        );
    }

    #[test]
    fn accepts_scheme_relative_allow_listed() {
        assert_eq!(
            safe_redirect(Some("//products.example.com/app"), &allow_list(), SELF_ORIGIN),
            Some("//products.example.com/app".to_string())
        );
    }

    #[test]
    fn rejects_unparseable_input() {
        assert_eq!(safe_redirect(Some("not a url"), &allow_list(), SELF_ORIGIN), None);
        assert_eq!(safe_redirect(Some("javascript:alert(1)"), &allow_list(), SELF_ORIGIN), None);
    }

    #[test]
    fn rejects_empty_and_missing() {
        assert_eq!(safe_redirect(None, &allow_list(), SELF_ORIGIN), None);
        assert_eq!(safe_redirect(Some(""), &allow_list(), SELF_ORIGIN), None);
        assert_eq!(safe_redirect(Some("   "), &allow_list(), SELF_ORIGIN), None);
    }

    #[test]
    fn fails_closed_without_valid_self_origin() {
        assert_eq!(safe_redirect(Some("/dashboard"), &allow_list(), ""), None);
        assert_eq!(safe_redirect(Some("/dashboard"), &allow_list(), "not-a-url"), None);
    }

    #[test]
    fn allow_list_entries_may_carry_trailing_slash() {
        let list = vec!["https://products.example.com/".to_string()];
        assert_eq!(
            safe_redirect(Some("https://products.example.com/app"), &list, SELF_ORIGIN),
            Some("https://products.example.com/app".to_string())
        );
    }

    #[test]
    fn parse_origin_list_trims_and_drops_empties() {
        let parsed = parse_origin_list(" https://a.example.com , ,https://b.example.com,");
        assert_eq!(
            parsed,
            vec![
                "https://a.example.com".to_string(),
                "https://b.example.com".to_string()
            ]
        );
        assert!(parse_origin_list("").is_empty());
    }
}
