//! Startup seeding of the well-known accounts.

use chrono::Utc;
use uuid::Uuid;

use siakad_domain::role::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::infra::password;

/// Ensure the default admin and user accounts exist. Accounts already in the
/// directory are left untouched, so operator-made changes survive restarts.
pub async fn seed_default_users<R: UserRepository>(
    repo: &R,
    bcrypt_cost: u32,
) -> Result<(), ApiError> {
    ensure(
        repo,
        bcrypt_cost,
        "admin@example.com",
        "Admin123",
        "Administrator",
        UserRole::Admin,
    )
    .await?;
    ensure(
        repo,
        bcrypt_cost,
        "user1@example.com",
        "User1234",
        "User One",
        UserRole::User,
    )
    .await?;
    Ok(())
}

async fn ensure<R: UserRepository>(
    repo: &R,
    bcrypt_cost: u32,
    email: &str,
    password: &str,
    name: &str,
    role: UserRole,
) -> Result<(), ApiError> {
    if repo.find_by_email(email).await?.is_some() {
        tracing::debug!(email, "seed account already present");
        return Ok(());
    }
    let now = Utc::now();
    repo.create(&User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        name: Some(name.to_owned()),
        password_digest: password::digest(password, bcrypt_cost).await?,
        role,
        refresh_token: None,
        created_at: now,
        updated_at: now,
    })
    .await?;
    tracing::info!(email, role = role.as_str(), "seeded account");
    Ok(())
}
