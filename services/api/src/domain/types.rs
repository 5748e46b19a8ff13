use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use siakad_domain::role::UserRole;

/// A directory account as stored. Never serialized to a client directly;
/// handlers project it into response structs without the digest.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_digest: String,
    pub role: UserRole,
    /// The single active refresh token; `None` when revoked or never issued.
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-wise partial update. `None` leaves the column untouched;
/// `refresh_token: Some(None)` clears the stored token.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_digest: Option<String>,
    pub role: Option<UserRole>,
    pub refresh_token: Option<Option<String>>,
}

/// AND-combined list filter: substring matches on email/name
/// (case-insensitive), exact match on role.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<UserRole>,
}

/// Signed token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// One row of the external student dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub nama: String,
    pub nim: String,
    pub ymd: String,
}
