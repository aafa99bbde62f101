use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID.
    pub sub: Uuid,
    /// Account role at issue time, e.g. `"customer"` or `"driver"`.
    pub role: String,
    pub kind: TokenKind,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
    /// Unique token identifier; refresh tokens are stored under it.
    pub jti: Uuid,
}

/// Access and refresh tokens handed out at login and on refresh.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_jti: Uuid,
    pub refresh_expires_at: DateTime<Utc>,
}

fn sign(claims: &Claims, secret: &str) -> anyhow::Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to encode {:?} token: {e}", claims.kind))
}

/// Issue a fresh access + refresh pair for `user_id`.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn issue_token_pair(user_id: Uuid, role: &str, config: &Config) -> anyhow::Result<TokenPair> {
    let now = Utc::now();
    let iat = now.timestamp();

    #[allow(clippy::cast_possible_wrap)]
    let access_exp = iat + config.jwt_access_expiration_secs as i64;
    #[allow(clippy::cast_possible_wrap)]
    let refresh_exp = iat + config.jwt_refresh_expiration_secs as i64;

    let access = Claims {
        sub: user_id,
        role: role.to_string(),
        kind: TokenKind::Access,
        exp: access_exp,
        iat,
        jti: Uuid::new_v4(),
    };
    let refresh = Claims {
        sub: user_id,
        role: role.to_string(),
        kind: TokenKind::Refresh,
        exp: refresh_exp,
        iat,
        jti: Uuid::new_v4(),
    };

    Ok(TokenPair {
        access_token: sign(&access, &config.jwt_secret)?,
        refresh_token: sign(&refresh, &config.jwt_secret)?,
        refresh_jti: refresh.jti,
        refresh_expires_at: DateTime::from_timestamp(refresh_exp, 0).unwrap_or(now),
    })
}

/// Decode a token, checking signature, expiry and that it is of the `expected` kind.
///
/// # Errors
///
/// Returns an error if the token is invalid, expired, or of the other kind.
pub fn decode_token(token: &str, secret: &str, expected: TokenKind) -> anyhow::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| anyhow::anyhow!("Invalid token: {e}"))?;

    if data.claims.kind != expected {
        return Err(anyhow::anyhow!(
            "Expected a {expected:?} token, got {:?}",
            data.claims.kind
        ));
    }

    Ok(data.claims)
}
