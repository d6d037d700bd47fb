//! Small helpers for auth input validation and log masking.

use regex::Regex;

/// Basic email format check before proxying credentials upstream.
pub(super) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Mask a bearer token for logs: keep a short prefix, drop the rest.
pub(crate) fn mask_token(token: &str) -> String {
    if token.len() <= 8 {
        return "***".to_string();
    }
    format!("{}***", &token[..8])
}

/// Mask an email for logs: keep the first character and the domain.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = &local[..local
                .char_indices()
                .nth(1)
                .map_or(local.len(), |(idx, _)| idx)];
            format!("{first}***@{domain}")
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn mask_token_keeps_only_prefix() {
        assert_eq!(mask_token("abcdefghijklmnop"), "abcdefgh***");
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token(""), "***");
    }

    #[test]
    fn mask_email_keeps_first_char_and_domain() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("x@example.com"), "x***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
