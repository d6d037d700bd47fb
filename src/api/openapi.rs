use utoipa::OpenApi;

use super::handlers::{auth, health};

/// `OpenAPI` document for every documented route.
///
/// Page shells stay undocumented on purpose; they are placeholders for a UI
/// bundle, not API surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::session::session,
        auth::tokens::set_token,
        auth::launch::launch,
        auth::logout::logout,
        auth::logout::logout_redirect,
        auth::logout::sso_logout,
        auth::sign_in::sign_in,
        auth::sign_up::sign_up,
        auth::verification::request_code,
        auth::verification::verify_code,
        auth::password::forgot_password,
        auth::password::reset_password,
    ),
    components(schemas(
        auth::types::SessionResponse,
        auth::types::SessionUser,
        auth::types::SetTokenRequest,
        auth::types::AckResponse,
        auth::types::SignInRequest,
        auth::types::SignInResponse,
        auth::types::SignUpRequest,
        auth::types::EmailRequest,
        auth::types::VerifyCodeRequest,
        auth::types::ResetPasswordRequest,
        auth::types::ProxyResponse,
    )),
    tags(
        (name = "pordego", description = "SSO front door and session gateway"),
        (name = "session", description = "Session cookies, silent refresh, logout"),
        (name = "sso", description = "Cross-application identity handoff"),
        (name = "auth", description = "Credential operations proxied to the auth backend"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
