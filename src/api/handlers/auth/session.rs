//! Session check endpoint with silent token refresh.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{
    claims,
    cookies::{self, ACCESS_COOKIE, REFRESH_COOKIE},
    gateway::GatewayError,
    state::AuthState,
    types::SessionResponse,
};

/// Session states evaluated from the cookie pair at a point in time.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SessionState {
    /// No tokens at all.
    Unauthenticated,
    /// A live, decodable access token.
    Authenticated(claims::Claims),
    /// Access token missing or expired, refresh token available.
    Refreshing { refresh_token: String },
    /// Access token missing or expired and nothing left to refresh with.
    Expired,
}

pub(crate) fn evaluate(access: Option<&str>, refresh: Option<&str>, now: i64) -> SessionState {
    if access.is_none() && refresh.is_none() {
        return SessionState::Unauthenticated;
    }

    if let Some(token) = access {
        if !claims::is_expired_at(Some(token), now) {
            if let Some(decoded) = claims::decode(token) {
                return SessionState::Authenticated(decoded);
            }
        }
    }

    match refresh {
        Some(token) => SessionState::Refreshing {
            refresh_token: token.to_string(),
        },
        None => SessionState::Expired,
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Active session; profile only, never the raw token", body = SessionResponse),
        (status = 401, description = "No session, expired session, or failed refresh", body = SessionResponse)
    ),
    tag = "session"
)]
pub async fn session(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let access = cookies::cookie_value(&headers, ACCESS_COOKIE);
    let refresh = cookies::cookie_value(&headers, REFRESH_COOKIE);
    let now = claims::now_unix();

    match evaluate(access.as_deref(), refresh.as_deref(), now) {
        SessionState::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            Json(SessionResponse::unauthenticated(None)),
        )
            .into_response(),
        SessionState::Authenticated(decoded) => {
            (StatusCode::OK, Json(SessionResponse::authenticated(decoded.into()))).into_response()
        }
        SessionState::Expired => {
            debug!("Access token expired with no refresh token");
            let mut response_headers = HeaderMap::new();
            if let Ok(set) = cookies::clear_session_cookies(state.config()) {
                cookies::append_set_cookies(&mut response_headers, set);
            }
            (
                StatusCode::UNAUTHORIZED,
                response_headers,
                Json(SessionResponse::unauthenticated(Some("expired"))),
            )
                .into_response()
        }
        SessionState::Refreshing { refresh_token } => {
            run_refresh(&state, &refresh_token, now).await.into_response()
        }
    }
}

/// Exchange the refresh token for a new access token and rotate the cookie
/// set, or clear it entirely.
///
/// Concurrent requests from the same browser (two tabs near expiry) may both
/// land here; there is no single-flight, so the cookie jar is last-write-wins
/// and the loser's refresh fails against an already-spent token, forcing
/// re-authentication. Accepted trade-off for a server with no session store.
async fn run_refresh(
    state: &Arc<AuthState>,
    refresh_token: &str,
    now: i64,
) -> (StatusCode, HeaderMap, Json<SessionResponse>) {
    match state.gateway().refresh(refresh_token).await {
        Ok(bundle) => {
            // The backend may rotate the refresh token; keep the old one
            // alive only when it does not.
            let rotated = bundle.refresh_token.as_deref().unwrap_or(refresh_token);

            let decoded = claims::decode(&bundle.access_token)
                .filter(|_| !claims::is_expired_at(Some(&bundle.access_token), now));
            let Some(decoded) = decoded else {
                warn!("Refresh returned an undecodable or already-expired access token");
                return refresh_failed(state);
            };

            let Ok(set) =
                cookies::session_cookies(state.config(), &bundle.access_token, Some(rotated), now)
            else {
                warn!("Refreshed tokens cannot be stored as cookies");
                return refresh_failed(state);
            };

            let mut response_headers = HeaderMap::new();
            cookies::append_set_cookies(&mut response_headers, set);
            (
                StatusCode::OK,
                response_headers,
                Json(SessionResponse::authenticated(decoded.into())),
            )
        }
        Err(GatewayError::Rejected { status, .. }) => {
            // Almost always a revoked or spent refresh token; no retry.
            warn!("Token refresh rejected by auth backend: {status}");
            refresh_failed(state)
        }
        Err(GatewayError::Unavailable(reason)) => {
            error!("Auth backend unavailable during refresh: {reason}");
            refresh_failed(state)
        }
    }
}

/// A failed refresh clears the whole cookie set so the browser is never left
/// with a stale access/refresh mismatch.
fn refresh_failed(state: &Arc<AuthState>) -> (StatusCode, HeaderMap, Json<SessionResponse>) {
    let mut response_headers = HeaderMap::new();
    if let Ok(set) = cookies::clear_session_cookies(state.config()) {
        cookies::append_set_cookies(&mut response_headers, set);
    }
    (
        StatusCode::UNAUTHORIZED,
        response_headers,
        Json(SessionResponse::unauthenticated(Some("refresh_failed"))),
    )
}
