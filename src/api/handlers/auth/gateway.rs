//! HTTP client for the upstream authentication backend.
//!
//! Every backend response is folded into a uniform result: a non-2xx status
//! becomes [`GatewayError::Rejected`] carrying the backend's own message, and
//! transport failures (refused, reset, timeout) become
//! [`GatewayError::Unavailable`]. Nothing here panics past the boundary, and
//! at the session layer both variants are handled fail-closed; they are kept
//! apart so operators can tell a credential rejection from a backend outage.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::{fmt, time::Duration};
use tracing::{debug, instrument};

use super::utils::mask_email;

#[derive(Debug)]
pub enum GatewayError {
    /// The backend answered with a non-success status.
    Rejected { status: StatusCode, message: String },
    /// The backend could not be reached, timed out, or answered garbage.
    Unavailable(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, message } => {
                write!(f, "auth backend rejected request: {status} {message}")
            }
            Self::Unavailable(reason) => write!(f, "auth backend unavailable: {reason}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Token pair returned by sign-in and refresh.
///
/// The refresh token is optional: the backend may or may not rotate it.
#[derive(Debug)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

pub struct AuthGateway {
    client: Client,
    base_url: String,
}

impl AuthGateway {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip_all)]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenBundle, GatewayError> {
        debug!("Signing in {}", mask_email(email));
        let body = json!({ "email": email, "password": password });
        let value = self.post_json("/auth/signin", &body, None).await?;
        extract_token_bundle(&value).ok_or_else(malformed_token_response)
    }

    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, GatewayError> {
        let body = json!({ "refreshToken": refresh_token });
        let value = self.post_json("/auth/refresh", &body, None).await?;
        extract_token_bundle(&value).ok_or_else(malformed_token_response)
    }

    /// Exchange a valid access token for a one-time authorization code.
    ///
    /// The code stands in for the token in the SSO callback URL so the token
    /// itself never appears in browser history or logs.
    #[instrument(skip_all)]
    pub async fn authorize(&self, access_token: &str) -> Result<String, GatewayError> {
        let value = self
            .post_json("/auth/authorize", &json!({}), Some(access_token))
            .await?;
        let data = nested_data(&value);
        data.get("code")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| GatewayError::Unavailable("missing authorization code".to_string()))
    }

    pub async fn sign_up(&self, payload: &Value) -> Result<Value, GatewayError> {
        self.post_json("/auth/signup", payload, None).await
    }

    pub async fn request_otp(&self, email: &str) -> Result<Value, GatewayError> {
        let body = json!({ "email": email });
        self.post_json("/auth/request-verify-email-code", &body, None)
            .await
    }

    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<Value, GatewayError> {
        let body = json!({ "email": email, "code": code });
        self.post_json("/auth/verify-email-code", &body, None).await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<Value, GatewayError> {
        let body = json!({ "email": email });
        self.post_json("/auth/send-reset-token", &body, None).await
    }

    pub async fn reset_password_with_code(
        &self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<Value, GatewayError> {
        let body = json!({ "email": email, "code": code, "password": password });
        self.post_json("/auth/reset-password", &body, None).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                GatewayError::Unavailable(format!("timeout calling {path}"))
            } else {
                GatewayError::Unavailable(err.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("request rejected")
                .to_string();
            return Err(GatewayError::Rejected { status, message });
        }

        response
            .json()
            .await
            .map_err(|err| GatewayError::Unavailable(format!("invalid response body: {err}")))
    }
}

/// Backends wrap payloads inconsistently; accept both `{data: {...}}` and a
/// bare object.
fn nested_data(value: &Value) -> &Value {
    value.get("data").filter(|data| data.is_object()).unwrap_or(value)
}

fn extract_token_bundle(value: &Value) -> Option<TokenBundle> {
    let data = nested_data(value);
    let access_token = data
        .get("accessToken")
        .or_else(|| data.get("token"))
        .and_then(Value::as_str)?
        .to_string();
    let refresh_token = data
        .get("refreshToken")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    Some(TokenBundle {
        access_token,
        refresh_token,
    })
}

fn malformed_token_response() -> GatewayError {
    GatewayError::Unavailable("malformed response: missing access token".to_string())
}
