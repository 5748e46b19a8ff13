use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::infra::db::DbUserRepository;
use crate::infra::students::HttpStudentSource;
use crate::infra::token::TokenConfig;
use crate::router::RouteTable;

/// Shared per-request context.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub tokens: TokenConfig,
    pub bcrypt_cost: u32,
    pub student_data_url: String,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn student_source(&self) -> HttpStudentSource {
        HttpStudentSource {
            http: self.http.clone(),
            url: self.student_data_url.clone(),
        }
    }
}

impl FromRef<AppState> for TokenConfig {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
