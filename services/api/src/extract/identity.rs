//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use siakad_domain::role::UserRole;

use crate::error::ApiError;
use crate::infra::token::TokenConfig;

/// Caller identity proven by a valid access token.
///
/// `email` and `role` are the signing-time snapshot from the claims, not a
/// fresh directory lookup.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl Identity {
    /// Gate for admin-only routes.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role != UserRole::Admin {
            return Err(ApiError::AdminRequired);
        }
        Ok(())
    }
}

/// The second word of the Authorization header, scheme unchecked.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .split(' ')
        .nth(1)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    TokenConfig: FromRef<S>,
{
    type Rejection = ApiError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers);
        let config = TokenConfig::from_ref(state);

        async move {
            let token = token.ok_or(ApiError::TokenRequired)?;
            let claims = config.decode_access(&token)?;
            let user_id = claims
                .sub
                .parse::<Uuid>()
                .map_err(|_| ApiError::InvalidToken)?;
            Ok(Self {
                user_id,
                email: claims.email,
                role: claims.role,
            })
        }
    }
}

/// An [`Identity`] that has already passed the admin gate.
///
/// As a handler argument it must come before any validating extractor, so
/// that authorization failures take precedence over validation ones.
#[derive(Debug, Clone)]
pub struct Admin(pub Identity);

impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
    TokenConfig: FromRef<S>,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let identity = Identity::from_request_parts(parts, state).await?;
            identity.require_admin()?;
            Ok(Self(identity))
        }
    }
}
