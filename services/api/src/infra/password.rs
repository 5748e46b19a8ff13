//! Password digesting. bcrypt keeps digests one-way verifiable; cost comes
//! from configuration so tests can run with a cheap setting. The work runs
//! on the blocking pool, not on a runtime worker.

use anyhow::Context as _;

use crate::error::ApiError;

pub async fn digest(plain: &str, cost: u32) -> Result<String, ApiError> {
    let plain = plain.to_owned();
    let digest = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await
        .context("join digest task")?
        .context("hash password")?;
    Ok(digest)
}

pub async fn matches(plain: &str, digest: &str) -> Result<bool, ApiError> {
    let plain = plain.to_owned();
    let digest = digest.to_owned();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &digest))
        .await
        .context("join verify task")?
        .context("verify password")?;
    Ok(ok)
}
