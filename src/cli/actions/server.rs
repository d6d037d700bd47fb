use crate::api;
use crate::api::handlers::auth::{redirect, AuthConfig};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub auth_api_url: String,
    pub public_base_url: String,
    pub allowed_app_origins: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub csrf_ttl_seconds: i64,
    pub upstream_timeout_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    // An empty list simply allows no cross-origin redirect at all; the
    // validator fails closed rather than trusting every origin.
    let origins = redirect::parse_origin_list(&args.allowed_app_origins);

    let config = AuthConfig::new(args.public_base_url, args.auth_api_url, origins)
        .with_default_access_ttl_seconds(args.access_ttl_seconds)
        .with_refresh_ttl_seconds(args.refresh_ttl_seconds)
        .with_csrf_ttl_seconds(args.csrf_ttl_seconds)
        .with_upstream_timeout_seconds(args.upstream_timeout_seconds);

    api::new(args.port, config).await
}
