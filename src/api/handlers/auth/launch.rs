//! SSO launch: hand the caller's identity to a downstream product.
//!
//! The access token is exchanged server-to-server for a one-time
//! authorization code, and only the code travels in the callback URL. The
//! product exchanges it for its own tokens out of band, so no bearer token
//! ever shows up in browser history, referrer headers, or access logs.

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{
    cookies::{self, ACCESS_COOKIE},
    gateway::GatewayError,
    redirect::safe_redirect,
    redirect_response, sign_in_url,
    state::AuthState,
    types::LaunchParams,
};
use url::Url;

#[utoipa::path(
    get,
    path = "/api/auth/launch",
    params(LaunchParams),
    responses(
        (status = 302, description = "Redirect to the product callback carrying a one-time code, or to sign-in"),
        (status = 400, description = "Missing url parameter")
    ),
    tag = "sso"
)]
pub async fn launch(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AuthState>>,
    Query(params): Query<LaunchParams>,
) -> Response {
    let config = state.config();

    let Some(product_url) = params
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    else {
        warn!("Launch requested without url parameter");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing url parameter" })),
        )
            .into_response();
    };

    // The product URL is a redirect target like any other: it must clear the
    // allow-list before this handler does anything with it. A disallowed
    // origin degrades to the caller's own dashboard instead of an error so
    // attacker-supplied input gets no distinguishable signal.
    let target = safe_redirect(
        Some(product_url),
        config.allowed_app_origins(),
        config.public_base_url(),
    )
    .and_then(|validated| Url::parse(&validated).ok());
    let Some(target) = target else {
        warn!("Launch requested for a disallowed or relative product URL");
        return redirect_response(&config.absolute_url("/dashboard"), Vec::new());
    };

    let landing = landing_path(&target, params.redirect.as_deref(), config);
    debug!("Launch target {}, landing path {landing}", target.origin().ascii_serialization());

    let Some(access_token) = cookies::cookie_value(&headers, ACCESS_COOKIE) else {
        debug!("No access token in cookies, redirecting to sign-in");
        return redirect_response(&sign_in_url(config, &[("prompt", "login")]), Vec::new());
    };

    match state.gateway().authorize(&access_token).await {
        Ok(code) => {
            let mut callback = target;
            callback.set_path("/auth/callback");
            callback.set_query(None);
            callback.set_fragment(None);
            callback
                .query_pairs_mut()
                .append_pair("code", &code)
                .append_pair("redirect", &landing);
            redirect_response(callback.as_str(), Vec::new())
        }
        Err(err) => {
            // Do not leak backend failure details to the browser; a fresh
            // sign-in either produces a working session or surfaces the real
            // credential problem.
            match &err {
                GatewayError::Rejected { status, .. } => {
                    warn!("Authorization code request rejected: {status}");
                }
                GatewayError::Unavailable(reason) => {
                    error!("Auth backend unavailable during launch: {reason}");
                }
            }
            redirect_response(&sign_in_url(config, &[("prompt", "login")]), Vec::new())
        }
    }
}

/// Where inside the product the browser should land after the callback.
///
/// Preference order: a `redirect` parameter embedded in the product URL, the
/// product URL's own non-root path+query, the caller's validated hint, `/`.
fn landing_path(target: &Url, hint: Option<&str>, config: &super::state::AuthConfig) -> String {
    if let Some(embedded) = target
        .query_pairs()
        .find(|(key, _)| key == "redirect")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
    {
        return embedded;
    }

    if target.path() != "/" {
        return match target.query() {
            Some(query) => format!("{}?{query}", target.path()),
            None => target.path().to_string(),
        };
    }

    safe_redirect(hint, config.allowed_app_origins(), config.public_base_url())
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::AuthConfig;

    fn config() -> AuthConfig {
        AuthConfig::new(
            "https://auth.example.com".to_string(),
            "https://api.example.com".to_string(),
            vec!["https://products.example.com".to_string()],
        )
    }

    #[test]
    fn landing_prefers_embedded_redirect() {
        let target = Url::parse("https://products.example.com/page?redirect=/orders").unwrap();
        assert_eq!(landing_path(&target, None, &config()), "/orders");
    }

    #[test]
    fn landing_falls_back_to_path_and_query() {
        let target = Url::parse("https://products.example.com/user/me?tab=2").unwrap();
        assert_eq!(landing_path(&target, None, &config()), "/user/me?tab=2");
    }

    #[test]
    fn landing_uses_validated_hint_for_root_urls() {
        let target = Url::parse("https://products.example.com/").unwrap();
        assert_eq!(landing_path(&target, Some("/orders"), &config()), "/orders");
        assert_eq!(
            landing_path(&target, Some("https://evil.example.com/"), &config()),
            "/"
        );
        assert_eq!(landing_path(&target, None, &config()), "/");
    }
}
