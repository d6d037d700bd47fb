//! Token storage endpoint, called right after sign-in or sign-up.
//!
//! Tokens arrive in the request body and leave as httpOnly cookies; they are
//! never echoed back and never logged unmasked.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{
    claims, cookies,
    state::AuthState,
    types::{AckResponse, SetTokenRequest},
    utils::mask_token,
};

#[utoipa::path(
    post,
    path = "/api/auth/set-token",
    request_body = SetTokenRequest,
    responses(
        (status = 200, description = "Tokens stored as httpOnly cookies", body = AckResponse),
        (status = 400, description = "Missing or invalid token")
    ),
    tag = "session"
)]
pub async fn set_token(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Result<Json<SetTokenRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = payload else {
        warn!("Token storage request with missing or non-string token");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing or invalid token" })),
        )
            .into_response();
    };

    if request.token.trim().is_empty() {
        warn!("Token storage request with empty token");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing or invalid token" })),
        )
            .into_response();
    }

    debug!(
        "Storing tokens ({}), refresh token present: {}",
        mask_token(&request.token),
        request.refresh_token.is_some()
    );

    let now = claims::now_unix();
    let set = cookies::session_cookies(
        state.config(),
        &request.token,
        request.refresh_token.as_deref(),
        now,
    );
    match set {
        Ok(set) => {
            let mut response_headers = HeaderMap::new();
            cookies::append_set_cookies(&mut response_headers, set);
            (
                StatusCode::OK,
                response_headers,
                Json(AckResponse { success: true }),
            )
                .into_response()
        }
        Err(_) => {
            warn!("Token cannot be stored as a cookie value");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing or invalid token" })),
            )
                .into_response()
        }
    }
}
