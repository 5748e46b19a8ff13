use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{TokenPair, User, UserPatch};
use crate::error::ApiError;
use crate::infra::password;
use crate::infra::token::TokenConfig;

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub tokens: TokenPair,
    pub user: User,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: TokenConfig,
}

impl<R: UserRepository> LoginUseCase<R> {
    /// Unknown email and wrong password fail with the same error, so the
    /// response does not reveal which accounts exist.
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let user = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !password::matches(&input.password, &user.password_digest).await? {
            return Err(ApiError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(&user)?;
        let user = self
            .repo
            .update(
                user.id,
                UserPatch {
                    refresh_token: Some(Some(pair.refresh_token.clone())),
                    ..Default::default()
                },
            )
            .await?;

        Ok(LoginOutput { tokens: pair, user })
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: TokenConfig,
}

impl<R: UserRepository> RefreshTokenUseCase<R> {
    /// Exchange a refresh token for a fresh pair. Single-session semantics:
    /// the presented token must be byte-identical to the stored one, and the
    /// new refresh token replaces it (rotation), so each refresh token works
    /// exactly once.
    pub async fn execute(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let claims = self.tokens.decode_refresh(refresh_token)?;
        let user_id: Uuid = claims.sub.parse().map_err(|_| ApiError::InvalidToken)?;

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;
        if user.refresh_token.as_deref() != Some(refresh_token) {
            return Err(ApiError::InvalidToken);
        }

        // Age guard on top of `exp`: a token issued longer ago than the
        // refresh TTL is treated as expired and the stored copy is revoked,
        // even if its `exp` claim would still pass (clock skew leeway).
        let now = Utc::now().timestamp() as u64;
        if now.saturating_sub(claims.iat) > self.tokens.refresh_exp_secs {
            self.repo
                .update(
                    user.id,
                    UserPatch {
                        refresh_token: Some(None),
                        ..Default::default()
                    },
                )
                .await?;
            return Err(ApiError::TokenExpired);
        }

        let pair = self.tokens.issue_pair(&user)?;
        self.repo
            .update(
                user.id,
                UserPatch {
                    refresh_token: Some(Some(pair.refresh_token.clone())),
                    ..Default::default()
                },
            )
            .await?;
        Ok(pair)
    }
}
