//! Page-route gating: who may see which page.
//!
//! Every incoming request is classified and either passed through or answered
//! with a redirect. Protocol surfaces (`/api`, `/sso`, health, docs) are never
//! page-gated here; the session layer enforces its own auth.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use super::{
    claims,
    cookies::{self, ACCESS_COOKIE},
    redirect::safe_redirect,
    redirect_response, sign_in_url,
    state::AuthState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RouteClass {
    /// Protocol endpoints, passed through untouched.
    Api,
    /// Pages anyone may see.
    Public,
    /// Sign-in/up pages; signed-in users are bounced to the dashboard.
    AuthOnly,
    /// Everything else requires a session.
    Protected,
}

const API_PREFIXES: &[&str] = &["/api", "/sso", "/health", "/swagger-ui", "/api-docs"];

const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/register",
    "/forgot-password",
    "/forgot-password/verify",
    "/forgot-password/reset",
    "/forgot-password/success",
];

const AUTH_ROUTES: &[&str] = &["/sign-in", "/sign-up"];

pub(crate) fn classify(path: &str) -> RouteClass {
    if API_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
    {
        return RouteClass::Api;
    }
    if PUBLIC_ROUTES.contains(&path) {
        return RouteClass::Public;
    }
    if AUTH_ROUTES.contains(&path) {
        return RouteClass::AuthOnly;
    }
    RouteClass::Protected
}

/// A session is "live" for gating purposes when the access cookie holds an
/// unexpired token. This is a UX decision only; no handler trusts it as
/// authorization.
fn has_live_session(request: &Request) -> bool {
    let access = cookies::cookie_value(request.headers(), ACCESS_COOKIE);
    !claims::is_expired(access.as_deref())
}

/// An explicit `redirect` or `prompt` parameter means the caller wants the
/// auth page even while signed in (switch-account, forced re-auth).
fn has_gate_override(query: Option<&str>) -> bool {
    let Some(query) = query else {
        return false;
    };
    url::form_urlencoded::parse(query.as_bytes())
        .any(|(key, _)| key == "redirect" || key == "prompt")
}

pub async fn route_gate(
    State(state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let config = state.config();
    let path = request.uri().path().to_string();

    match classify(&path) {
        RouteClass::Api | RouteClass::Public => next.run(request).await,
        RouteClass::AuthOnly => {
            if has_live_session(&request) && !has_gate_override(request.uri().query()) {
                debug!("Signed-in caller on {path}, redirecting to dashboard");
                return redirect_response(&config.absolute_url("/dashboard"), Vec::new());
            }
            next.run(request).await
        }
        RouteClass::Protected => {
            if has_live_session(&request) {
                return next.run(request).await;
            }

            // Carry the original destination so the user comes back here
            // after signing in. Validated like any other redirect target.
            let original = match request.uri().query() {
                Some(query) => format!("{path}?{query}"),
                None => path.clone(),
            };
            debug!("No session for {path}, redirecting to sign-in");
            let location = match safe_redirect(
                Some(&original),
                config.allowed_app_origins(),
                config.public_base_url(),
            ) {
                Some(target) => sign_in_url(config, &[("redirect", &target)]),
                None => sign_in_url(config, &[]),
            };
            redirect_response(&location, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_and_protocol_paths_pass() {
        assert_eq!(classify("/api/auth/session"), RouteClass::Api);
        assert_eq!(classify("/api/logout"), RouteClass::Api);
        assert_eq!(classify("/sso/logout"), RouteClass::Api);
        assert_eq!(classify("/health"), RouteClass::Api);
        assert_eq!(classify("/swagger-ui"), RouteClass::Api);
        assert_eq!(classify("/api-docs/openapi.json"), RouteClass::Api);
    }

    #[test]
    fn public_routes_are_exact_matches() {
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/register"), RouteClass::Public);
        assert_eq!(classify("/forgot-password/reset"), RouteClass::Public);
        // Not a listed public page, so it needs a session.
        assert_eq!(classify("/forgot-password/unknown"), RouteClass::Protected);
    }

    #[test]
    fn auth_routes_and_the_rest() {
        assert_eq!(classify("/sign-in"), RouteClass::AuthOnly);
        assert_eq!(classify("/sign-up"), RouteClass::AuthOnly);
        assert_eq!(classify("/dashboard"), RouteClass::Protected);
        assert_eq!(classify("/settings/profile"), RouteClass::Protected);
    }

    #[test]
    fn gate_override_detection() {
        assert!(has_gate_override(Some("redirect=/orders")));
        assert!(has_gate_override(Some("prompt=login")));
        assert!(has_gate_override(Some("a=1&prompt=login")));
        assert!(!has_gate_override(Some("a=1&b=2")));
        assert!(!has_gate_override(None));
    }
}
