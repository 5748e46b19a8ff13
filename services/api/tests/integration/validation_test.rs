use axum::http::{StatusCode, header};
use serde_json::{Value, json};
use uuid::Uuid;

use siakad_domain::role::UserRole;

use crate::helpers::{access_token, bearer, test_server};

// ── Body classification ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_unparseable_json_before_validation() {
    let (server, _) = test_server();

    let response = server.post("/v1/auth/login").text("{ not json").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body = response.json::<Value>();
    assert_eq!(body["message"], "Invalid JSON body");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn should_report_the_expected_shape_when_the_body_is_empty() {
    let (server, _) = test_server();

    let response = server.post("/v1/auth/login").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body = response.json::<Value>();
    assert_eq!(
        body["errors"],
        json!({
            "expectedFields": ["email", "password"],
            "missingFields": ["email", "password"],
        })
    );
    // Validation responses carry the errors object alone.
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn should_flag_typo_keys_alongside_the_missing_field() {
    let (server, _) = test_server();

    let response = server
        .post("/v1/auth/login")
        .json(&json!({"email": "a@b.co", "passwordd": "Secret123"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({
            "expectedFields": ["email", "password"],
            "missingFields": ["password"],
            "unexpectedFields": ["passwordd"],
        })
    );
}

#[tokio::test]
async fn should_list_every_rule_failure_for_a_field() {
    let (server, _) = test_server();

    let response = server
        .post("/v1/auth/login")
        .json(&json!({"email": "admin@example.com", "password": "short"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let errors = &response.json::<Value>()["errors"];
    assert_eq!(
        errors["password"],
        json!([
            "Password must be at least 8 characters",
            "Password must contain at least one uppercase letter",
        ])
    );
    assert!(errors.get("email").is_none());
}

#[tokio::test]
async fn should_reject_an_empty_refresh_token() {
    let (server, _) = test_server();

    let response = server
        .post("/v1/auth/refresh")
        .json(&json!({"refreshToken": ""}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({"refreshToken": ["Refresh token is required"]})
    );
}

// ── Update body rule ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_enforce_the_update_rule_only_after_field_checks() {
    let (server, tokens) = test_server();
    let admin_token = access_token(&tokens, UserRole::Admin);
    let path = format!("/v1/users/{}", Uuid::now_v7());

    // Every field is optional, so an empty update fails the object rule.
    let response = server
        .put(&path)
        .add_header(header::AUTHORIZATION, bearer(&admin_token))
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({"fields": ["At least one field must be provided for update"]})
    );

    // A field failure short-circuits the object rule.
    let response = server
        .put(&path)
        .add_header(header::AUTHORIZATION, bearer(&admin_token))
        .json(&json!({"role": "ROOT"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({"role": ["Role must be either USER or ADMIN"]})
    );
}

// ── Path and query parameters ────────────────────────────────────────────────

#[tokio::test]
async fn should_validate_path_and_query_for_the_directory() {
    let (server, tokens) = test_server();
    let admin_token = access_token(&tokens, UserRole::Admin);

    let response = server
        .get("/v1/users/42")
        .add_header(header::AUTHORIZATION, bearer(&admin_token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({"id": ["Invalid user ID format"]})
    );

    let response = server
        .get("/v1/users?page=0")
        .add_header(header::AUTHORIZATION, bearer(&admin_token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({"page": ["Page must be at least 1"]})
    );
}
