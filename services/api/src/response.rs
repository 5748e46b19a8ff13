use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Success envelope: `{message?, data?}`. Absent members are omitted from
/// the JSON entirely, never rendered as null.
#[derive(Debug, Serialize)]
pub struct Reply<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> Reply<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: Some(message),
            data: Some(data),
        }
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl Reply<()> {
    /// Message-only success body, e.g. after a delete.
    pub fn message(message: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            message: Some(message),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(&self)).into_response()
    }
}
