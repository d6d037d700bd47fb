//! Credential sign-in: proxy to the backend, then persist the session.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{
    claims, cookies,
    gateway::GatewayError,
    state::AuthState,
    types::{SessionUser, SignInRequest, SignInResponse},
    utils::{mask_email, valid_email},
};

fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(SignInResponse {
            success: false,
            user: None,
            message: Some(message.to_string()),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in; session cookies set", body = SignInResponse),
        (status = 400, description = "Malformed credentials", body = SignInResponse),
        (status = 401, description = "Credentials rejected", body = SignInResponse)
    ),
    tag = "auth"
)]
pub async fn sign_in(
    Extension(state): Extension<Arc<AuthState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "Invalid request");
    };

    let email = request.email.trim();
    if !valid_email(email) || request.password.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Invalid email or password format");
    }

    match state.gateway().sign_in(email, &request.password).await {
        Ok(bundle) => {
            let now = claims::now_unix();
            let user = claims::decode(&bundle.access_token).map(SessionUser::from);
            debug!("Sign-in succeeded for {}", mask_email(email));

            let set = cookies::session_cookies(
                state.config(),
                &bundle.access_token,
                bundle.refresh_token.as_deref(),
                now,
            );
            let Ok(set) = set else {
                warn!("Sign-in tokens cannot be stored as cookies");
                return failure(StatusCode::BAD_REQUEST, "Invalid token received");
            };

            let mut response_headers = HeaderMap::new();
            cookies::append_set_cookies(&mut response_headers, set);
            (
                StatusCode::OK,
                response_headers,
                Json(SignInResponse {
                    success: true,
                    user,
                    message: None,
                }),
            )
                .into_response()
        }
        // The backend's own message passes through untouched; this layer adds
        // no wrong-password-vs-unknown-user detail of its own.
        Err(GatewayError::Rejected { status, message }) => {
            debug!("Sign-in rejected for {}: {status}", mask_email(email));
            failure(StatusCode::UNAUTHORIZED, &message)
        }
        Err(GatewayError::Unavailable(reason)) => {
            error!("Auth backend unavailable during sign-in: {reason}");
            failure(
                StatusCode::UNAUTHORIZED,
                "Authentication service unavailable",
            )
        }
    }
}
