//! # Pordego (SSO Front Door & Session Gateway)
//!
//! `pordego` is the server-side front door for a centrally hosted
//! authentication backend. It owns the browser-facing session: bearer tokens
//! live in `HttpOnly` cookies, expired access tokens are silently refreshed,
//! and signed-in identity is handed off to independent downstream product
//! applications without a bearer token ever appearing in a URL.
//!
//! ## Session Model
//!
//! All session state lives in the client's cookie jar; the server holds no
//! session store and stays stateless between requests.
//!
//! - **Access cookie:** lifetime derived from the token's own `exp` claim,
//!   capped at seven days. The payload is decoded for expiry checks and
//!   profile display only; signature verification stays with the backend.
//! - **Refresh cookie:** seven-day lifetime, exchanged for fresh access
//!   tokens. A failed refresh clears the whole cookie set so the browser is
//!   never left with a mismatched pair.
//! - **Logged-in flag:** a non-`HttpOnly` mirror so page scripts can show
//!   signed-in UI without reading tokens.
//!
//! ## SSO Handoff
//!
//! `GET /api/auth/launch` exchanges the caller's access token for a one-time
//! authorization code minted by the backend and redirects the browser to the
//! product's callback with that code. Every redirect target, the product URL
//! included, must clear a configured origin allow-list first; anything else
//! degrades to a safe same-origin destination.
//!
//! ## Request Gating
//!
//! Page routes are classified public, auth-only, or protected. Unauthenticated
//! visitors to protected pages are sent to sign-in carrying their original
//! destination; signed-in visitors are kept off the auth pages unless they
//! ask for them explicitly. State-changing API requests carry a double-submit
//! CSRF token.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
