//! Request/response types for the session and auth proxy endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::claims::Claims;

/// Profile fields surfaced to the UI. Never includes the raw token.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_picture: Option<String>,
    pub user_type: Option<String>,
    pub phone: Option<String>,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            display_picture: claims.display_picture,
            user_type: claims.user_type,
            phone: claims.phone,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SessionResponse {
    pub(crate) fn authenticated(user: SessionUser) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
            reason: None,
        }
    }

    pub(crate) fn unauthenticated(reason: Option<&str>) -> Self {
        Self {
            authenticated: false,
            user: None,
            reason: reason.map(ToString::to_string),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetTokenRequest {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(IntoParams, Deserialize, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct LaunchParams {
    /// Downstream product URL to hand the session off to.
    pub url: Option<String>,
    /// Landing path hint inside the product.
    pub redirect: Option<String>,
}

#[derive(IntoParams, Deserialize, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct SsoLogoutParams {
    /// Where to send the browser after it signs in again.
    pub redirect: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignInResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Signup payload forwarded to the backend as-is.
///
/// Field names follow the backend contract, including the all-lowercase
/// `confirmpassword` it expects.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    pub password: String,
    #[serde(rename = "confirmpassword")]
    pub confirm_password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub password: String,
}

/// Uniform envelope for proxied backend responses.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProxyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<Value>,
}

impl ProxyResponse {
    pub(crate) fn from_backend(value: Value) -> Self {
        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        let data = value.get("data").cloned();
        Self {
            success,
            message,
            data,
        }
    }

    pub(crate) fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            data: None,
        }
    }
}
