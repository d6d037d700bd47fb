//! Email verification code proxies.

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
    types::{EmailRequest, ProxyResponse, VerifyCodeRequest},
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
    path = "/api/request-verification-code",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Verification code sent", body = ProxyResponse),
        (status = 400, description = "Malformed request or backend rejection", body = ProxyResponse),
        (status = 502, description = "Auth backend unavailable", body = ProxyResponse)
    ),
    tag = "auth"
)]
pub async fn request_code(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return invalid_request();
    };
    debug!(
        "Verification code requested for {}",
        mask_email(&request.email)
    );
    match state.gateway().request_otp(&request.email).await {
        Ok(value) => (StatusCode::OK, Json(ProxyResponse::from_backend(value))).into_response(),
        Err(err) => proxy_error("request-verification-code", &err),
    }
}

#[utoipa::path(
    post,
    path = "/api/verify-code",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Code verified", body = ProxyResponse),
        (status = 400, description = "Malformed request or backend rejection", body = ProxyResponse),
        (status = 502, description = "Auth backend unavailable", body = ProxyResponse)
    ),
    tag = "auth"
)]
pub async fn verify_code(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Result<Json<VerifyCodeRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return invalid_request();
    };
    debug!("Verifying code for {}", mask_email(&request.email));
    match state
        .gateway()
        .verify_otp(&request.email, &request.code)
        .await
    {
        Ok(value) => (StatusCode::OK, Json(ProxyResponse::from_backend(value))).into_response(),
        Err(err) => proxy_error("verify-code", &err),
    }
}
