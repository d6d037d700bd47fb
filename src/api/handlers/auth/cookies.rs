//! Session cookie building, parsing, and clearing.
//!
//! The cookie jar is the only session store: an httpOnly access/refresh pair,
//! a client-visible logged-in flag, and the CSRF pairing cookie. Cookie sets
//! that belong together (refresh rotation, logout) are built as a whole
//! before anything is appended to the response, so the browser never keeps a
//! mismatched pair.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use super::{claims, state::AuthConfig};

pub(crate) const ACCESS_COOKIE: &str = "pordego_access";
pub(crate) const REFRESH_COOKIE: &str = "pordego_refresh";
pub(crate) const LOGGED_IN_COOKIE: &str = "pordego_logged_in";
pub(crate) const CSRF_COOKIE: &str = "csrf_token";

/// Cookie names from the previous session implementation, cleared on logout
/// so stale browsers cannot keep a half-alive session.
const LEGACY_COOKIES: &[&str] = &["pordego_session", "__Secure-pordego_session", "access_token"];

/// Read a cookie value from the request headers.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

pub(super) fn build_cookie(
    name: &str,
    value: &str,
    max_age: i64,
    http_only: bool,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    cookie.push_str(&format!("; SameSite=Lax; Max-Age={max_age}"));
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Max-Age for the access cookie, derived from the token's own `exp` claim.
///
/// Remaining lifetime clamped to `[0, cap]`; the configured default applies
/// only when the claim is missing or the token cannot be decoded. Wall-clock
/// assumptions about when the token was issued are never used, so a
/// short-lived token cannot be kept alive longer than the backend intended.
pub(crate) fn access_cookie_max_age(config: &AuthConfig, token: &str, now: i64) -> i64 {
    claims::decode(token).and_then(|claims| claims.exp).map_or(
        config.default_access_ttl_seconds(),
        |exp| (exp - now).clamp(0, config.access_ttl_cap_seconds()),
    )
}

/// Build the full session cookie set: access, refresh (when rotated), and the
/// logged-in flag. The flag always carries the refresh lifetime since it
/// signals "a refresh is still possible".
pub(crate) fn session_cookies(
    config: &AuthConfig,
    access_token: &str,
    refresh_token: Option<&str>,
    now: i64,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let secure = config.cookie_secure();
    let access_max_age = access_cookie_max_age(config, access_token, now);

    let mut set = vec![build_cookie(
        ACCESS_COOKIE,
        access_token,
        access_max_age,
        true,
        secure,
    )?];
    if let Some(refresh_token) = refresh_token {
        set.push(build_cookie(
            REFRESH_COOKIE,
            refresh_token,
            config.refresh_ttl_seconds(),
            true,
            secure,
        )?);
    }
    set.push(build_cookie(
        LOGGED_IN_COOKIE,
        "1",
        config.refresh_ttl_seconds(),
        false,
        secure,
    )?);
    Ok(set)
}

/// Removal cookies for the session set. Idempotent; safe without a session.
pub(crate) fn clear_session_cookies(
    config: &AuthConfig,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let secure = config.cookie_secure();
    [ACCESS_COOKIE, REFRESH_COOKIE, LOGGED_IN_COOKIE]
        .iter()
        .map(|name| build_cookie(name, "", 0, false, secure))
        .collect()
}

/// Removal cookies for pre-rotation cookie names.
pub(crate) fn clear_legacy_cookies(
    config: &AuthConfig,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let secure = config.cookie_secure();
    LEGACY_COOKIES
        .iter()
        .map(|name| build_cookie(name, "", 0, false, secure))
        .collect()
}

pub(crate) fn append_set_cookies(headers: &mut HeaderMap, values: Vec<HeaderValue>) {
    for value in values {
        headers.append(SET_COOKIE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::super::claims::tests::forge_token;
    use super::*;
    use serde_json::json;

    fn config() -> AuthConfig {
        AuthConfig::new(
            "https://auth.example.com".to_string(),
            "https://api.example.com".to_string(),
            Vec::new(),
        )
    }

    fn as_strings(values: &[HeaderValue]) -> Vec<String> {
        values
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn cookie_value_parses_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("a=1; pordego_access=token-value; b=2"),
        );
        assert_eq!(
            cookie_value(&headers, ACCESS_COOKIE),
            Some("token-value".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
        assert_eq!(cookie_value(&HeaderMap::new(), ACCESS_COOKIE), None);
    }

    #[test]
    fn cookie_value_treats_empty_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("pordego_access="));
        assert_eq!(cookie_value(&headers, ACCESS_COOKIE), None);
    }

    #[test]
    fn max_age_derives_from_exp_claim() {
        let now = 1_700_000_000;
        let token = forge_token(&json!({"exp": now + 1800}));
        let max_age = access_cookie_max_age(&config(), &token, now);
        assert!((1799..=1801).contains(&max_age), "got {max_age}");
    }

    #[test]
    fn max_age_clamps_and_defaults() {
        let now = 1_700_000_000;
        let config = config();

        // Already expired: clamp to zero, not a negative Max-Age.
        let expired = forge_token(&json!({"exp": now - 100}));
        assert_eq!(access_cookie_max_age(&config, &expired, now), 0);

        // Far-future exp: capped at the refresh horizon.
        let distant = forge_token(&json!({"exp": now + 60 * 60 * 24 * 30}));
        assert_eq!(
            access_cookie_max_age(&config, &distant, now),
            config.access_ttl_cap_seconds()
        );

        // Missing claim or undecodable token: default lifetime.
        let no_exp = forge_token(&json!({"id": "u-1"}));
        assert_eq!(
            access_cookie_max_age(&config, &no_exp, now),
            config.default_access_ttl_seconds()
        );
        assert_eq!(
            access_cookie_max_age(&config, "garbage", now),
            config.default_access_ttl_seconds()
        );
    }

    #[test]
    fn session_cookie_set_is_complete() {
        let now = 1_700_000_000;
        let token = forge_token(&json!({"exp": now + 600}));
        let set = session_cookies(&config(), &token, Some("refresh-1"), now).unwrap();

        let cookies = as_strings(&set);
        assert_eq!(cookies.len(), 3);
        assert!(cookies[0].starts_with("pordego_access="));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].contains("Max-Age=600"));
        assert!(cookies[0].contains("Secure"));
        assert!(cookies[1].starts_with("pordego_refresh=refresh-1"));
        assert!(cookies[1].contains("HttpOnly"));
        assert!(cookies[1].contains("Max-Age=604800"));
        assert!(cookies[2].starts_with("pordego_logged_in=1"));
        assert!(!cookies[2].contains("HttpOnly"));
        assert!(cookies[2].contains("Max-Age=604800"));
    }

    #[test]
    fn refresh_cookie_left_untouched_when_not_rotated() {
        let now = 1_700_000_000;
        let token = forge_token(&json!({"exp": now + 600}));
        let set = session_cookies(&config(), &token, None, now).unwrap();

        let cookies = as_strings(&set);
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| !c.starts_with("pordego_refresh=")));
    }

    #[test]
    fn clear_removes_the_full_set() {
        let mut headers = HeaderMap::new();
        append_set_cookies(&mut headers, clear_session_cookies(&config()).unwrap());
        append_set_cookies(&mut headers, clear_legacy_cookies(&config()).unwrap());

        let cookies: Vec<String> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(ToString::to_string)
            .collect();
        assert_eq!(cookies.len(), 3 + LEGACY_COOKIES.len());
        for cookie in &cookies {
            assert!(cookie.contains("Max-Age=0"), "{cookie}");
        }
        assert!(cookies.iter().any(|c| c.starts_with("pordego_access=;")));
        assert!(cookies.iter().any(|c| c.starts_with("pordego_refresh=;")));
        assert!(cookies.iter().any(|c| c.starts_with("pordego_logged_in=;")));
        assert!(cookies.iter().any(|c| c.starts_with("pordego_session=;")));
    }
}
