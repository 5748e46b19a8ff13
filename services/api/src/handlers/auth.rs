use axum::extract::State;
use serde::Serialize;

use siakad_domain::role::UserRole;

use crate::domain::types::{TokenPair, User};
use crate::error::ApiError;
use crate::extract::validate::ValidBody;
use crate::response::Reply;
use crate::schemas::{LoginBody, RefreshBody};
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase, RefreshTokenUseCase};

// ── POST /v1/auth/login ──────────────────────────────────────────────────────

/// Claims-level snapshot of the authenticated account, without timestamps.
#[derive(Serialize)]
pub struct UserSummary {
    pub email: String,
    pub id: String,
    pub name: Option<String>,
    pub role: UserRole,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id.to_string(),
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Serialize)]
pub struct LoginData {
    pub tokens: TokenPair,
    pub user: UserSummary,
}

pub async fn login(
    State(state): State<AppState>,
    ValidBody(body): ValidBody<LoginBody>,
) -> Result<Reply<LoginData>, ApiError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Reply::ok(
        "Login successful",
        LoginData {
            tokens: out.tokens,
            user: out.user.into(),
        },
    ))
}

// ── POST /v1/auth/refresh ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TokensData {
    pub tokens: TokenPair,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    ValidBody(body): ValidBody<RefreshBody>,
) -> Result<Reply<TokensData>, ApiError> {
    let usecase = RefreshTokenUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let tokens = usecase.execute(&body.refresh_token).await?;
    Ok(Reply::ok("Token refreshed successfully", TokensData { tokens }))
}
