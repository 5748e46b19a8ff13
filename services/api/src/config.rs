use crate::infra::token::TokenConfig;

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3000). Env var: `API_PORT`.
    pub port: u16,
    /// HS256 secret for access tokens. Env var: `JWT_ACCESS_SECRET`.
    pub access_secret: String,
    /// HS256 secret for refresh tokens. Env var: `JWT_REFRESH_SECRET`.
    pub refresh_secret: String,
    /// Access token lifetime in seconds (default 900). Env var: `ACCESS_TOKEN_EXP`.
    pub access_exp_secs: u64,
    /// Refresh token lifetime in seconds (default 604800). Env var: `REFRESH_TOKEN_EXP`.
    pub refresh_exp_secs: u64,
    /// bcrypt cost factor for password digests (default 10). Env var: `BCRYPT_COST`.
    pub bcrypt_cost: u32,
    /// Upstream URL of the student dataset. Env var: `STUDENT_DATA_URL`.
    pub student_data_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            access_secret: std::env::var("JWT_ACCESS_SECRET").expect("JWT_ACCESS_SECRET"),
            refresh_secret: std::env::var("JWT_REFRESH_SECRET").expect("JWT_REFRESH_SECRET"),
            access_exp_secs: std::env::var("ACCESS_TOKEN_EXP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            refresh_exp_secs: std::env::var("REFRESH_TOKEN_EXP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604_800),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            student_data_url: std::env::var("STUDENT_DATA_URL")
                .unwrap_or_else(|_| "https://bit.ly/48ejMhW".into()),
        }
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            access_secret: self.access_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_exp_secs: self.access_exp_secs,
            refresh_exp_secs: self.refresh_exp_secs,
        }
    }
}
