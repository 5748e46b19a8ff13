use chrono::Utc;
use uuid::Uuid;

use siakad_domain::pagination::{PageMeta, PageRequest};
use siakad_domain::role::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserFilter, UserPatch};
use crate::error::ApiError;
use crate::infra::password;

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
    pub role: UserRole,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
    pub bcrypt_cost: u32,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiError> {
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: input.email,
            name: input.name,
            password_digest: password::digest(&input.password, self.bcrypt_cost).await?,
            role: input.role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── GetUsers ─────────────────────────────────────────────────────────────────

pub struct GetUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUsersUseCase<R> {
    pub async fn execute(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, PageMeta), ApiError> {
        let page = page.clamped();
        let (users, total) = self.repo.list(&filter, page).await?;
        Ok((users, PageMeta::new(page, total)))
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
    pub bcrypt_cost: u32,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, input: UpdateUserInput) -> Result<User, ApiError> {
        let current = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        // Only a changed email needs the uniqueness check; re-submitting the
        // current address is a no-op, not a conflict.
        if let Some(ref email) = input.email {
            if *email != current.email && self.repo.find_by_email(email).await?.is_some() {
                return Err(ApiError::EmailTaken);
            }
        }

        let password_digest = match input.password.as_deref() {
            Some(plain) => Some(password::digest(plain, self.bcrypt_cost).await?),
            None => None,
        };

        self.repo
            .update(
                user_id,
                UserPatch {
                    email: input.email,
                    name: input.name,
                    password_digest,
                    role: input.role,
                    refresh_token: None,
                },
            )
            .await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.repo.delete(user_id).await? {
            Ok(())
        } else {
            Err(ApiError::UserNotFound)
        }
    }
}
