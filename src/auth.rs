use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::ApiError};

/// Name of the session cookie set on signup/login and cleared on logout.
pub const SESSION_COOKIE: &str = "fv_token";

/// Session lifetime. The cookie Max-Age and the token `exp` claim both derive
/// from this so the browser and the server expire the session together.
pub const SESSION_TTL_DAYS: i64 = 7;
const SESSION_TTL_SECONDS: i64 = SESSION_TTL_DAYS * 24 * 60 * 60;

/// Claims
///
/// The signed payload carried inside a session token. The session is
/// self-contained: authenticating a request reads identity from these claims
/// alone, with no user lookup. A deleted or renamed account keeps its issued
/// sessions until they expire.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The account's email, the stable identity key.
    pub email: String,
    /// Display name at issue time, denormalized into created content.
    pub username: String,
    /// Expiration time as a Unix timestamp. Tokens past this are rejected.
    pub exp: usize,
}

/// TokenRejection
///
/// Why a session token failed validation. Each variant maps to a distinct
/// client-facing message, all under a 401 status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// No token was presented at all.
    Missing,
    /// The token was well-formed and correctly signed but past its `exp`.
    Expired,
    /// Anything else: bad signature, garbage input, wrong algorithm.
    Malformed,
}

impl TokenRejection {
    pub fn message(&self) -> &'static str {
        match self {
            TokenRejection::Missing => "Not authenticated",
            TokenRejection::Expired => "Token expired",
            TokenRejection::Malformed => "Invalid token",
        }
    }
}

/// Signs a fresh session token for the given identity.
pub fn issue_token(
    email: &str,
    username: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        email: email.to_string(),
        username: username.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validates a presented session token and returns its claims.
///
/// `None` means no token was presented. Expiration is always enforced.
pub fn validate_session(token: Option<&str>, secret: &str) -> Result<Claims, TokenRejection> {
    let token = token.ok_or(TokenRejection::Missing)?;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(TokenRejection::Expired),
            _ => Err(TokenRejection::Malformed),
        },
    }
}

/// Builds the Set-Cookie value that installs a session token in the browser.
///
/// HttpOnly keeps the token out of reach of page scripts; SameSite=Lax lets
/// top-level navigations carry it while blocking cross-site subrequests.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; Max-Age={SESSION_TTL_SECONDS}; HttpOnly; SameSite=Lax")
}

/// Builds the Set-Cookie value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// AuthUser
///
/// The resolved identity of an authenticated request, produced by the
/// extractor below. Handlers take this as their first argument to require a
/// valid session; its fields are stamped into created content.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub username: String,
}

/// Pulls the session token out of the request, if any.
///
/// The cookie is the primary transport. A `Bearer` Authorization header is
/// accepted as a fallback for non-browser clients; when both are present the
/// cookie wins.
fn session_token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
    {
        for pair in cookie_header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any authenticated handler and as the gate inside the
/// router-level auth middleware.
///
/// Validation is purely cryptographic: extract the token, check signature and
/// expiry, read the identity out of the claims. There is no store access here.
///
/// Rejection: 401 with the specific `TokenRejection` message as the body.
impl<S> FromRequestParts<S> for AuthUser
where
    // S must allow sending across threads and sharing.
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the JWT secret).
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = session_token_from_parts(parts);
        let claims = validate_session(token.as_deref(), &config.jwt_secret)
            .map_err(|rejection| ApiError::Unauthorized(rejection.message()))?;

        Ok(AuthUser {
            email: claims.email,
            username: claims.username,
        })
    }
}
