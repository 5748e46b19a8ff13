use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use siakad_api::domain::repository::{StudentSource, UserRepository};
use siakad_api::domain::types::{User, UserFilter, UserPatch};
use siakad_api::error::ApiError;
use siakad_api::infra::token::{TokenConfig, TokenKind};
use siakad_api::router::{RouteTable, build_router};
use siakad_api::state::AppState;
use siakad_domain::pagination::PageRequest;
use siakad_domain::role::UserRole;

pub const TEST_COST: u32 = 4;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// In-memory account store. Clones share the same store, so several use
/// cases can run against one directory.
#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the stored accounts for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = Some(name);
        }
        if let Some(digest) = patch.password_digest {
            user.password_digest = digest;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(token) = patch.refresh_token {
            user.refresh_token = token;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| {
                filter
                    .email
                    .as_ref()
                    .is_none_or(|e| u.email.to_lowercase().contains(&e.to_lowercase()))
                    && filter.name.as_ref().is_none_or(|n| {
                        u.name
                            .as_ref()
                            .is_some_and(|un| un.to_lowercase().contains(&n.to_lowercase()))
                    })
                    && filter.role.is_none_or(|r| u.role == r)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = users.len() as u64;
        let page_items = users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_items, total))
    }
}

// ── MockStudentSource ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockStudentSource {
    pub raw: String,
}

impl StudentSource for MockStudentSource {
    async fn fetch_raw(&self) -> Result<String, ApiError> {
        Ok(self.raw.clone())
    }
}

pub struct FailingStudentSource;

impl StudentSource for FailingStudentSource {
    async fn fetch_raw(&self) -> Result<String, ApiError> {
        Err(ApiError::DataSource(anyhow::anyhow!("connection refused")))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_token_config() -> TokenConfig {
    TokenConfig {
        access_secret: "integration-access-secret".into(),
        refresh_secret: "integration-refresh-secret".into(),
        access_exp_secs: 900,
        refresh_exp_secs: 604_800,
    }
}

pub fn test_user(email: &str, password: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: email.into(),
        name: Some("Test User".into()),
        password_digest: bcrypt::hash(password, TEST_COST).unwrap(),
        role,
        refresh_token: None,
        created_at: now,
        updated_at: now,
    }
}

/// A bearer token accepted by the test server, for a user that need not
/// exist in any store (identity is taken from the claims).
pub fn access_token(tokens: &TokenConfig, role: UserRole) -> String {
    let user = test_user("bearer@example.com", "Secret12", role);
    tokens.sign(&user, TokenKind::Access).unwrap()
}

pub fn bearer(token: &str) -> axum::http::HeaderValue {
    axum::http::HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

/// Router wired to a disconnected database. Exercises everything in front of
/// the repository (fallbacks, auth order, validation) without Postgres; a
/// request that reaches the repository fails as a plain internal error.
pub fn test_server() -> (TestServer, TokenConfig) {
    let tokens = test_token_config();
    let state = AppState {
        db: DatabaseConnection::default(),
        http: reqwest::Client::new(),
        tokens: tokens.clone(),
        bcrypt_cost: TEST_COST,
        student_data_url: "http://127.0.0.1:9/students".into(),
        routes: Arc::new(RouteTable::new()),
    };
    let server = TestServer::new(build_router(state)).unwrap();
    (server, tokens)
}
