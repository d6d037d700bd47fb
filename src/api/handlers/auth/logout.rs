//! Logout endpoints: the API variant and the cross-application SSO variant.

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use super::{
    cookies, redirect::safe_redirect, redirect_response, sign_in_url, state::AuthState,
    types::AckResponse, types::SsoLogoutParams,
};

fn clearing_cookies(state: &AuthState) -> Vec<axum::http::HeaderValue> {
    let mut set = cookies::clear_session_cookies(state.config()).unwrap_or_default();
    set.extend(cookies::clear_legacy_cookies(state.config()).unwrap_or_default());
    set
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cookies cleared", body = AckResponse)
    ),
    tag = "session"
)]
pub async fn logout(Extension(state): Extension<Arc<AuthState>>) -> impl IntoResponse {
    debug!("Clearing session cookies");
    let mut response_headers = HeaderMap::new();
    cookies::append_set_cookies(&mut response_headers, clearing_cookies(&state));
    (
        StatusCode::OK,
        response_headers,
        Json(AckResponse { success: true }),
    )
}

#[utoipa::path(
    get,
    path = "/api/logout",
    responses(
        (status = 302, description = "Session cookies cleared, browser sent to sign-in")
    ),
    tag = "session"
)]
pub async fn logout_redirect(Extension(state): Extension<Arc<AuthState>>) -> impl IntoResponse {
    debug!("Clearing session cookies and redirecting to sign-in");
    let location = sign_in_url(state.config(), &[]);
    redirect_response(&location, clearing_cookies(&state))
}

/// Logout entry point for downstream products.
///
/// Clears every session cookie, current and legacy names alike, then sends
/// the browser back to sign-in with a forced credential prompt. The redirect
/// hint survives the round trip only when it passes the allow-list check.
#[utoipa::path(
    get,
    path = "/sso/logout",
    params(SsoLogoutParams),
    responses(
        (status = 302, description = "All session cookies cleared, browser sent to sign-in")
    ),
    tag = "sso"
)]
pub async fn sso_logout(
    Extension(state): Extension<Arc<AuthState>>,
    Query(params): Query<SsoLogoutParams>,
) -> impl IntoResponse {
    let config = state.config();
    let redirect = safe_redirect(
        params.redirect.as_deref(),
        config.allowed_app_origins(),
        config.public_base_url(),
    )
    .unwrap_or_else(|| "/".to_string());

    debug!("SSO logout, post-sign-in redirect: {redirect}");
    let location = sign_in_url(config, &[("prompt", "login"), ("redirect", &redirect)]);
    redirect_response(&location, clearing_cookies(&state))
}
