//! Minimal shells for the page routes gated by the route gate.
//!
//! The real UI is a separately deployed web bundle; these handlers keep the
//! page paths routable so gating redirects have concrete destinations.

use axum::{http::Uri, response::IntoResponse, Json};
use serde_json::json;

pub async fn page_shell(uri: Uri) -> impl IntoResponse {
    Json(json!({
        "app": env!("CARGO_PKG_NAME"),
        "route": uri.path(),
    }))
}
