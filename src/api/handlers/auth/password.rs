//! Password reset proxies.

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
    types::{EmailRequest, ProxyResponse, ResetPasswordRequest},
    utils::mask_email,
};

fn invalid_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ProxyResponse::failure("Invalid request")),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/forgot-password",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset code sent", body = ProxyResponse),
        (status = 400, description = "Malformed request or backend rejection", body = ProxyResponse),
        (status = 502, description = "Auth backend unavailable", body = ProxyResponse)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return invalid_request();
    };
    debug!("Password reset requested for {}", mask_email(&request.email));
    match state.gateway().request_password_reset(&request.email).await {
        Ok(value) => (StatusCode::OK, Json(ProxyResponse::from_backend(value))).into_response(),
        Err(err) => proxy_error("forgot-password", &err),
    }
}

#[utoipa::path(
    post,
    path = "/api/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ProxyResponse),
        (status = 400, description = "Malformed request or backend rejection", body = ProxyResponse),
        (status = 502, description = "Auth backend unavailable", body = ProxyResponse)
    ),
    tag = "auth"
)]
pub async fn reset_password(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return invalid_request();
    };
    debug!("Resetting password for {}", mask_email(&request.email));
    match state
        .gateway()
        .reset_password_with_code(&request.email, &request.code, &request.password)
        .await
    {
        Ok(value) => (StatusCode::OK, Json(ProxyResponse::from_backend(value))).into_response(),
        Err(err) => proxy_error("reset-password", &err),
    }
}
