//! Double-submit CSRF protection for state-changing API requests.
//!
//! A random token lives in a non-httpOnly cookie and must be echoed in the
//! `x-csrf-token` header. The cookie is issued by this middleware whenever a
//! response leaves for a browser that does not have one yet, and reused (not
//! rotated) while it lives.

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{header::SET_COOKIE, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use super::{
    cookies::{self, CSRF_COOKIE},
    state::AuthState,
};

pub(crate) const CSRF_HEADER: &str = "x-csrf-token";

/// Same-origin routes that cannot carry a custom header, like the token
/// storage call made immediately after a redirect.
const EXEMPT_PATHS: &[&str] = &["/api/auth/set-token"];

/// Create a new CSRF token. The value is random, not derived from the
/// session, so it carries no information worth stealing on its own.
pub(crate) fn generate_csrf_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate csrf token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

pub(crate) fn requires_csrf(method: &Method, path: &str) -> bool {
    let safe = [Method::GET, Method::HEAD, Method::OPTIONS].contains(method);
    if safe {
        return false;
    }
    if !path.starts_with("/api/") {
        return false;
    }
    !EXEMPT_PATHS.iter().any(|exempt| path.starts_with(exempt))
}

pub async fn csrf_guard(
    State(state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let cookie_token = cookies::cookie_value(request.headers(), CSRF_COOKIE);

    if requires_csrf(request.method(), request.uri().path()) {
        let header_token = request
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok());
        let matches = matches!(
            (cookie_token.as_deref(), header_token),
            (Some(cookie), Some(header)) if cookie == header
        );
        if !matches {
            warn!(
                "CSRF token validation failed for {} {}",
                request.method(),
                request.uri().path()
            );
            // Rejection mutates nothing, the cookie included.
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "CSRF token validation failed" })),
            )
                .into_response();
        }
    }

    let mut response = next.run(request).await;

    if cookie_token.is_none() {
        if let Ok(token) = generate_csrf_token() {
            if let Ok(cookie) = cookies::build_cookie(
                CSRF_COOKIE,
                &token,
                state.config().csrf_ttl_seconds(),
                false,
                state.config().cookie_secure(),
            ) {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_methods_are_exempt() {
        assert!(!requires_csrf(&Method::GET, "/api/logout"));
        assert!(!requires_csrf(&Method::HEAD, "/api/logout"));
        assert!(!requires_csrf(&Method::OPTIONS, "/api/logout"));
        assert!(requires_csrf(&Method::POST, "/api/logout"));
    }

    #[test]
    fn non_api_paths_are_exempt() {
        assert!(!requires_csrf(&Method::POST, "/sign-in"));
        assert!(!requires_csrf(&Method::POST, "/"));
    }

    #[test]
    fn set_token_callback_is_exempt() {
        assert!(!requires_csrf(&Method::POST, "/api/auth/set-token"));
        assert!(requires_csrf(&Method::POST, "/api/auth/sign-in"));
    }

    #[test]
    fn generated_tokens_are_unique_and_url_safe() {
        let first = generate_csrf_token().unwrap();
        let second = generate_csrf_token().unwrap();
        assert_ne!(first, second);
        assert_eq!(Base64UrlUnpadded::decode_vec(&first).unwrap().len(), 32);
    }
}
