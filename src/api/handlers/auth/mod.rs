//! Session, SSO, and auth proxy handlers.

pub mod claims;
pub mod cookies;
pub mod csrf;
pub mod gateway;
pub mod launch;
pub mod logout;
pub mod password;
pub mod redirect;
pub mod route_gate;
pub mod session;
pub mod sign_in;
pub mod sign_up;
pub mod state;
pub mod tokens;
pub mod types;
pub mod verification;

mod utils;

pub use self::gateway::{AuthGateway, GatewayError};
pub use self::state::{AuthConfig, AuthState};

// Common helpers for the handlers.

use axum::{
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;
use url::Url;

use self::types::ProxyResponse;

/// `302 Found` with optional cookie mutations.
pub(super) fn redirect_response(location: &str, cookies: Vec<HeaderValue>) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(LOCATION, value);
    }
    cookies::append_set_cookies(&mut headers, cookies);
    (StatusCode::FOUND, headers).into_response()
}

/// Absolute sign-in URL on this application's origin, with query parameters.
pub(super) fn sign_in_url(config: &AuthConfig, params: &[(&str, &str)]) -> String {
    match Url::parse(&config.absolute_url("/sign-in")) {
        Ok(mut url) => {
            if !params.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (key, value) in params {
                    pairs.append_pair(key, value);
                }
            }
            url.to_string()
        }
        // A relative fallback keeps the redirect on our own origin even with
        // broken configuration.
        Err(_) => "/sign-in".to_string(),
    }
}

/// Fold a gateway failure into the uniform proxy envelope.
///
/// Backend rejections pass the backend's own message through without added
/// detail; transport failures are logged for operators and answered with a
/// generic message so outage details never reach the browser.
pub(super) fn proxy_error(operation: &str, err: &GatewayError) -> Response {
    match err {
        GatewayError::Rejected { message, .. } => (
            StatusCode::BAD_REQUEST,
            Json(ProxyResponse::failure(message)),
        )
            .into_response(),
        GatewayError::Unavailable(reason) => {
            error!("Auth backend unavailable during {operation}: {reason}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ProxyResponse::failure("Authentication service unavailable")),
            )
                .into_response()
        }
    }
}
