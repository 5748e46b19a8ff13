use axum::routing::{MethodRouter, delete, get, post, put};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use siakad_core::health::{healthz, readyz};
use siakad_core::middleware::request_id_layer;

use crate::handlers::{auth, student, user};
use crate::state::AppState;

/// The full route table. Registration, the 405 Allow header, and the route
/// catalog in 404/405 bodies are all derived from this one list.
fn routes() -> Vec<(Method, &'static str, MethodRouter<AppState>)> {
    vec![
        // Health
        (Method::GET, "/healthz", get(healthz)),
        (Method::GET, "/readyz", get(readyz)),
        // Auth
        (Method::POST, "/v1/auth/login", post(auth::login)),
        (Method::POST, "/v1/auth/refresh", post(auth::refresh_token)),
        // User directory (admin only)
        (Method::POST, "/v1/users", post(user::create_user)),
        (Method::GET, "/v1/users", get(user::get_users)),
        (Method::GET, "/v1/users/{id}", get(user::get_user)),
        (Method::PUT, "/v1/users/{id}", put(user::update_user)),
        (Method::DELETE, "/v1/users/{id}", delete(user::delete_user)),
        // Student search
        (
            Method::GET,
            "/v1/students/search/name/{name}",
            get(student::search_by_name),
        ),
        (
            Method::GET,
            "/v1/students/search/nim/{nim}",
            get(student::search_by_nim),
        ),
        (
            Method::GET,
            "/v1/students/search/ymd/{ymd}",
            get(student::search_by_ymd),
        ),
    ]
}

/// Method/path pairs mirroring the registered routes, for answering "which
/// methods does this path support" on 405s.
pub struct RouteTable {
    entries: Vec<(Method, &'static str)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            entries: routes().into_iter().map(|(m, p, _)| (m, p)).collect(),
        }
    }

    /// Methods registered for a concrete request path, in table order.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.entries
            .iter()
            .filter(|(_, pattern)| pattern_matches(pattern, path))
            .map(|(method, _)| method.clone())
            .collect()
    }

    /// `Allow` header value for a concrete request path.
    pub fn allow_value(&self, path: &str) -> String {
        self.allowed_methods(path)
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Segment-wise match of a concrete path against a route pattern.
/// A `{param}` segment matches any single non-empty segment.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut expected = pattern.split('/');
    let mut actual = path.split('/');
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(e), Some(a)) => {
                if e.starts_with('{') && e.ends_with('}') {
                    if a.is_empty() {
                        return false;
                    }
                } else if e != a {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

// ── Fallbacks ────────────────────────────────────────────────────────────────

async fn endpoint_not_found(method: Method, uri: Uri) -> Response {
    let message = format!("Endpoint {method} '{}' not found", uri.path());
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

async fn method_not_allowed(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    let message = format!("Method {method} not allowed for '{path}'");
    let mut response = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": message })),
    )
        .into_response();
    if let Ok(allow) = HeaderValue::from_str(&state.routes.allow_value(path)) {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}

// ── Router ───────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new();
    for (_, path, handler) in routes() {
        router = router.route(path, handler);
    }
    router
        .fallback(endpoint_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
