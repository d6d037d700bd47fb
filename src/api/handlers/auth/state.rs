//! Auth configuration and shared state.

use std::time::Duration;

use super::gateway::AuthGateway;

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 60 * 60;
const ACCESS_TTL_CAP_SECONDS: i64 = 60 * 60 * 24 * 7;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 60 * 60 * 24 * 7;
const DEFAULT_CSRF_TTL_SECONDS: i64 = 60 * 60 * 24;
const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    public_base_url: String,
    auth_api_base_url: String,
    allowed_app_origins: Vec<String>,
    default_access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    csrf_ttl_seconds: i64,
    upstream_timeout_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(
        public_base_url: String,
        auth_api_base_url: String,
        allowed_app_origins: Vec<String>,
    ) -> Self {
        Self {
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            auth_api_base_url,
            allowed_app_origins,
            default_access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            csrf_ttl_seconds: DEFAULT_CSRF_TTL_SECONDS,
            upstream_timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
        }
    }

    #[must_use]
    pub fn with_default_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.default_access_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_csrf_ttl_seconds(mut self, seconds: i64) -> Self {
        self.csrf_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_upstream_timeout_seconds(mut self, seconds: u64) -> Self {
        self.upstream_timeout_seconds = seconds;
        self
    }

    #[must_use]
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    #[must_use]
    pub fn auth_api_base_url(&self) -> &str {
        &self.auth_api_base_url
    }

    #[must_use]
    pub fn allowed_app_origins(&self) -> &[String] {
        &self.allowed_app_origins
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    pub(crate) fn default_access_ttl_seconds(&self) -> i64 {
        self.default_access_ttl_seconds
    }

    pub(crate) fn access_ttl_cap_seconds(&self) -> i64 {
        ACCESS_TTL_CAP_SECONDS
    }

    pub(crate) fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    pub(crate) fn csrf_ttl_seconds(&self) -> i64 {
        self.csrf_ttl_seconds
    }

    /// Only mark cookies secure when the application is served over HTTPS.
    pub(crate) fn cookie_secure(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }

    /// Absolute URL on this application's own origin.
    pub(crate) fn absolute_url(&self, path: &str) -> String {
        format!("{}{path}", self.public_base_url)
    }
}

pub struct AuthState {
    config: AuthConfig,
    gateway: AuthGateway,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, gateway: AuthGateway) -> Self {
        Self { config, gateway }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }
}
