use axum::extract::State;
use serde::Serialize;

use siakad_domain::pagination::PageMeta;
use siakad_domain::role::UserRole;

use crate::domain::types::{User, UserFilter};
use crate::error::ApiError;
use crate::extract::identity::Admin;
use crate::extract::validate::{ValidBody, ValidParams, ValidQuery};
use crate::response::Reply;
use crate::schemas::{CreateUserBody, IdParam, ListUsersQuery, UpdateUserBody};
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, GetUsersUseCase,
    UpdateUserInput, UpdateUserUseCase,
};

/// Directory projection of an account. The password digest and the stored
/// refresh token never leave the service.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "siakad_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "siakad_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /v1/users ───────────────────────────────────────────────────────────

pub async fn create_user(
    Admin(_): Admin,
    State(state): State<AppState>,
    ValidBody(body): ValidBody<CreateUserBody>,
) -> Result<Reply<UserResponse>, ApiError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        bcrypt_cost: state.bcrypt_cost,
    };
    let user = usecase
        .execute(CreateUserInput {
            email: body.email,
            name: body.name,
            password: body.password,
            role: body.role,
        })
        .await?;
    Ok(Reply::created("User created successfully", user.into()))
}

// ── GET /v1/users ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UsersData {
    pub users: Vec<UserResponse>,
    pub pagination: PageMeta,
}

pub async fn get_users(
    Admin(_): Admin,
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListUsersQuery>,
) -> Result<Reply<UsersData>, ApiError> {
    let usecase = GetUsersUseCase {
        repo: state.user_repo(),
    };
    let filter = UserFilter {
        email: query.email,
        name: query.name,
        role: query.role,
    };
    let (users, pagination) = usecase.execute(filter, query.page).await?;
    Ok(Reply::ok(
        "Users retrieved successfully",
        UsersData {
            users: users.into_iter().map(Into::into).collect(),
            pagination,
        },
    ))
}

// ── GET /v1/users/{id} ───────────────────────────────────────────────────────

pub async fn get_user(
    Admin(_): Admin,
    State(state): State<AppState>,
    ValidParams(params): ValidParams<IdParam>,
) -> Result<Reply<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(params.id).await?;
    Ok(Reply::ok("User retrieved successfully", user.into()))
}

// ── PUT /v1/users/{id} ───────────────────────────────────────────────────────

pub async fn update_user(
    Admin(_): Admin,
    State(state): State<AppState>,
    ValidParams(params): ValidParams<IdParam>,
    ValidBody(body): ValidBody<UpdateUserBody>,
) -> Result<Reply<UserResponse>, ApiError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
        bcrypt_cost: state.bcrypt_cost,
    };
    let user = usecase
        .execute(
            params.id,
            UpdateUserInput {
                email: body.email,
                name: body.name,
                password: body.password,
                role: body.role,
            },
        )
        .await?;
    Ok(Reply::ok("User updated successfully", user.into()))
}

// ── DELETE /v1/users/{id} ────────────────────────────────────────────────────

pub async fn delete_user(
    Admin(_): Admin,
    State(state): State<AppState>,
    ValidParams(params): ValidParams<IdParam>,
) -> Result<Reply<()>, ApiError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(params.id).await?;
    Ok(Reply::message("User deleted successfully"))
}
