#![allow(async_fn_in_trait)]

use uuid::Uuid;

use siakad_domain::pagination::PageRequest;

use crate::domain::types::{User, UserFilter, UserPatch};
use crate::error::ApiError;

/// Repository for directory accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Apply a partial update and return the resulting record.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ApiError>;

    /// Delete an account. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Filtered page ordered by creation time, newest first, plus the total
    /// match count before paging.
    async fn list(&self, filter: &UserFilter, page: PageRequest)
    -> Result<(Vec<User>, u64), ApiError>;
}

/// Port for the external student dataset.
pub trait StudentSource: Send + Sync {
    /// Fetch the raw pipe-delimited table. One network round trip per call,
    /// no caching.
    async fn fetch_raw(&self) -> Result<String, ApiError>;
}
