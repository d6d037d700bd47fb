//! Sign-up proxy.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use super::{
    proxy_error,
    state::AuthState,
    types::{ProxyResponse, SignUpRequest},
    utils::mask_email,
};

#[utoipa::path(
    post,
    path = "/api/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = ProxyResponse),
        (status = 400, description = "Malformed request or backend rejection", body = ProxyResponse),
        (status = 502, description = "Auth backend unavailable", body = ProxyResponse)
    ),
    tag = "auth"
)]
pub async fn sign_up(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ProxyResponse::failure("Invalid request")),
        )
            .into_response();
    };

    debug!("Sign-up requested for {}", mask_email(&request.email));

    let Ok(body) = serde_json::to_value(&request) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ProxyResponse::failure("Invalid request")),
        )
            .into_response();
    };

    match state.gateway().sign_up(&body).await {
        Ok(value) => (StatusCode::OK, Json(ProxyResponse::from_backend(value))).into_response(),
        Err(err) => proxy_error("sign-up", &err),
    }
}
