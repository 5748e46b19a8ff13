//! JWT signing and validation for the two token families.

use anyhow::Context;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use siakad_domain::role::UserRole;

use crate::domain::types::{TokenPair, User};
use crate::error::ApiError;

/// Which token family a claim set belongs to. Wire values `"access"` /
/// `"refresh"` in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload. `email` and `role` are a point-in-time snapshot of
/// the user at signing; later profile changes do not invalidate the token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (UUID string).
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issued-at (seconds since epoch). The refresh flow re-derives token
    /// age from this, independently of `exp`.
    pub iat: u64,
    /// Expiration (seconds since epoch).
    pub exp: u64,
}

/// Secrets and lifetimes for both token families.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_exp_secs: u64,
    pub refresh_exp_secs: u64,
}

impl TokenConfig {
    /// Sign one token of the given kind for `user`, with fresh `iat`/`exp`.
    pub fn sign(&self, user: &User, kind: TokenKind) -> Result<String, ApiError> {
        let (secret, ttl) = match kind {
            TokenKind::Access => (&self.access_secret, self.access_exp_secs),
            TokenKind::Refresh => (&self.refresh_secret, self.refresh_exp_secs),
        };
        let iat = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            kind,
            iat,
            exp: iat + ttl,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .context("sign jwt")?;
        Ok(token)
    }

    /// Sign a fresh access + refresh pair for `user`.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, ApiError> {
        Ok(TokenPair {
            access_token: self.sign(user, TokenKind::Access)?,
            refresh_token: self.sign(user, TokenKind::Refresh)?,
        })
    }

    pub fn decode_access(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = decode_jwt(token, &self.access_secret)?;
        if claims.kind != TokenKind::Access {
            return Err(ApiError::InvalidTokenType);
        }
        Ok(claims)
    }

    pub fn decode_refresh(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = decode_jwt(token, &self.refresh_secret)?;
        if claims.kind != TokenKind::Refresh {
            return Err(ApiError::InvalidTokenType);
        }
        Ok(claims)
    }
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s tolerates clock skew against token issuers.
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::InvalidToken,
    })?;

    Ok(data.claims)
}
