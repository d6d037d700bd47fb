use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
// OpenAPI document assembly lives in openapi.rs.
mod openapi;

pub use openapi::openapi;

use handlers::auth::{self, AuthConfig, AuthGateway, AuthState};
use handlers::{health, pages};

/// Build the application router around shared auth state.
///
/// Split from [`new`] so the assembled router can be driven in-process by
/// tests.
#[must_use]
pub fn app(state: Arc<AuthState>) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        .route("/api/auth/session", get(auth::session::session))
        .route("/api/auth/set-token", post(auth::tokens::set_token))
        .route("/api/auth/sign-in", post(auth::sign_in::sign_in))
        .route("/api/auth/launch", get(auth::launch::launch))
        .route(
            "/api/logout",
            post(auth::logout::logout).get(auth::logout::logout_redirect),
        )
        .route("/api/sign-up", post(auth::sign_up::sign_up))
        .route(
            "/api/request-verification-code",
            post(auth::verification::request_code),
        )
        .route("/api/verify-code", post(auth::verification::verify_code))
        .route("/api/forgot-password", post(auth::password::forgot_password))
        .route("/api/reset-password", post(auth::password::reset_password))
        .route("/sso/logout", get(auth::logout::sso_logout))
        .route("/health", get(health::health))
        .route("/", get(pages::page_shell))
        .route("/sign-in", get(pages::page_shell))
        .route("/sign-up", get(pages::page_shell))
        .route("/register", get(pages::page_shell))
        .route("/dashboard", get(pages::page_shell))
        .route("/forgot-password", get(pages::page_shell))
        .route("/forgot-password/verify", get(pages::page_shell))
        .route("/forgot-password/reset", get(pages::page_shell))
        .route("/forgot-password/success", get(pages::page_shell))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::route_gate::route_gate,
                ))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::csrf::csrf_guard,
                ))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, config: AuthConfig) -> Result<()> {
    let gateway = AuthGateway::new(config.auth_api_base_url(), config.upstream_timeout())?;
    let state = Arc::new(AuthState::new(config, gateway));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Product origins may call the session endpoint with credentials for silent
/// sign-on checks; nothing else crosses origins. An empty allow-list allows
/// no cross-origin caller at all.
fn cors_layer(config: &AuthConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_app_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim_end_matches('/')).ok())
        .collect();

    CorsLayer::new()
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
