use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

pub const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub fresh: bool,
    pub iat: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub sub: Option<String>,
    pub nbf: i64,
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(identity: Option<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            fresh: false,
            iat,
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            sub: identity,
            nbf: iat,
            exp: iat + ttl.num_seconds(),
        }
    }
}

#[derive(Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

/// Encodes `claims` as a compact HS256 JWT.
pub fn sign_access_token(claims: &AccessClaims, secret: &[u8]) -> Result<String, ApiError> {
    let header = serde_json::to_vec(&TokenHeader {
        alg: "HS256",
        typ: "JWT",
    })
    .map_err(|error| ApiError::Internal(format!("failed to encode token header: {error}")))?;
    let payload = serde_json::to_vec(claims)
        .map_err(|error| ApiError::Internal(format!("failed to encode token claims: {error}")))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|error| ApiError::Internal(format!("invalid signing key: {error}")))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

/// Issues an access token for any caller that supplies a non-empty password.
pub fn issue_access_token(
    secret: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, ApiError> {
    if password.is_none_or(str::is_empty) {
        return Err(ApiError::Unauthorized(
            "bad username or password".to_string(),
        ));
    }

    let secret = secret
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| ApiError::Internal("JWT signing key is not configured".to_string()))?;

    let claims = AccessClaims::new(username.map(str::to_string), issued_at, ttl);
    sign_access_token(&claims, secret.as_bytes())
}

/// Returns the bearer token from an `Authorization` header value.
///
/// Only presence is checked; the token is not verified.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, ApiError> {
    let header = authorization
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

    let (scheme, token) = header.split_once(char::is_whitespace).ok_or_else(|| {
        ApiError::Unauthorized("expected 'Authorization: Bearer <token>'".to_string())
    })?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::Unauthorized(
            "expected 'Authorization: Bearer <token>'".to_string(),
        ));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::Unauthorized("bearer token is empty".to_string()));
    }

    Ok(token)
}
