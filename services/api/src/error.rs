use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Api service error variants. Display strings are the client-facing
/// message contract; internal causes are logged, never serialized.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(serde_json::Value),
    #[error("Invalid JSON body")]
    InvalidJson,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Access token is required")]
    TokenRequired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token type")]
    InvalidTokenType,
    #[error("Admin access required")]
    AdminRequired,
    #[error("User not found")]
    UserNotFound,
    #[error("User with this email already exists")]
    EmailTaken,
    #[error("Internal server error")]
    DataSource(#[source] anyhow::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidJson => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::TokenRequired
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::InvalidTokenType => StatusCode::UNAUTHORIZED,
            Self::AdminRequired => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::DataSource(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, "internal error"),
            Self::DataSource(e) => tracing::error!(error = %e, "student data source failure"),
            _ => {}
        }
        let body = match self {
            Self::Validation(errors) => serde_json::json!({ "errors": errors }),
            other => serde_json::json!({ "message": other.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
