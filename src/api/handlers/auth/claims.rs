//! Bearer token payload decoding.
//!
//! This is a decode, not a verify: the payload is read to decide whether a
//! refresh is due and to surface profile fields to the UI. Signature
//! verification stays with the upstream auth backend, so nothing here may be
//! used as an authorization decision on its own.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use utoipa::ToSchema;

/// Claims carried in the access token payload, camelCase on the wire.
#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_picture: Option<String>,
    pub user_type: Option<String>,
    pub phone: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

/// Seconds since the Unix epoch.
#[must_use]
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

/// Decode the payload segment of a bearer token.
///
/// Returns `None` on any malformed input (missing segment, bad base64,
/// bad JSON) so callers treat such tokens as absent.
#[must_use]
pub fn decode(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1).filter(|seg| !seg.is_empty())?;
    let bytes = Base64UrlUnpadded::decode_vec(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expiry check against an explicit clock, for deterministic callers.
///
/// A missing token, an undecodable token, or a token without an `exp` claim
/// all count as expired.
#[must_use]
pub fn is_expired_at(token: Option<&str>, now: i64) -> bool {
    let Some(claims) = token.and_then(decode) else {
        return true;
    };
    let Some(exp) = claims.exp else {
        return true;
    };
    exp <= now
}

/// Expiry check against the current wall clock.
#[must_use]
pub fn is_expired(token: Option<&str>) -> bool {
    is_expired_at(token, now_unix())
}
