use axum::http::{StatusCode, header};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use siakad_api::error::ApiError;
use siakad_api::handlers::auth::LoginData;
use siakad_api::infra::token::{Claims, TokenKind};
use siakad_api::seed::seed_default_users;
use siakad_api::usecase::auth::{LoginInput, LoginUseCase, RefreshTokenUseCase};
use siakad_domain::role::UserRole;

use crate::helpers::{
    MockUserRepo, TEST_COST, access_token, bearer, test_server, test_token_config,
};

// ── Login and refresh against a seeded directory ─────────────────────────────

#[tokio::test]
async fn should_login_with_seeded_credentials_and_refresh_the_session() {
    let repo = MockUserRepo::empty();
    seed_default_users(&repo, TEST_COST).await.unwrap();
    let tokens = test_token_config();

    let login = LoginUseCase {
        repo: repo.clone(),
        tokens: tokens.clone(),
    };
    let out = login
        .execute(LoginInput {
            email: "admin@example.com".into(),
            password: "Admin123".into(),
        })
        .await
        .unwrap();

    let claims = tokens.decode_access(&out.tokens.access_token).unwrap();
    assert_eq!(claims.email, "admin@example.com");
    assert_eq!(claims.role, UserRole::Admin);
    assert_eq!(claims.sub, out.user.id.to_string());

    // The wire projection exposes the public fields; the digest appears
    // nowhere in the serialized body.
    let digest = out.user.password_digest.clone();
    let wire = serde_json::to_value(LoginData {
        tokens: out.tokens.clone(),
        user: out.user.clone().into(),
    })
    .unwrap();
    assert_eq!(wire["user"]["role"], "ADMIN");
    assert_eq!(wire["user"]["email"], "admin@example.com");
    assert!(wire["tokens"]["accessToken"].is_string());
    assert!(!wire.to_string().contains(&digest));

    let refresh = RefreshTokenUseCase {
        repo: repo.clone(),
        tokens,
    };
    let pair = refresh.execute(&out.tokens.refresh_token).await.unwrap();

    let users = repo.users_handle();
    let stored = users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.email == "admin@example.com")
        .and_then(|u| u.refresh_token.clone());
    assert_eq!(stored.as_deref(), Some(pair.refresh_token.as_str()));
}

#[tokio::test]
async fn should_invalidate_the_previous_session_token_on_a_new_login() {
    let repo = MockUserRepo::empty();
    seed_default_users(&repo, TEST_COST).await.unwrap();
    let tokens = test_token_config();

    // A live session from an earlier login, backdated so the next login's
    // token cannot be byte-identical to it.
    let now = Utc::now().timestamp() as u64;
    let earlier = {
        let users = repo.users_handle();
        let mut guard = users.lock().unwrap();
        let admin = guard
            .iter_mut()
            .find(|u| u.email == "admin@example.com")
            .unwrap();
        let claims = Claims {
            sub: admin.id.to_string(),
            email: admin.email.clone(),
            role: admin.role,
            kind: TokenKind::Refresh,
            iat: now - 100,
            exp: now + 900,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(tokens.refresh_secret.as_bytes()),
        )
        .unwrap();
        admin.refresh_token = Some(token.clone());
        token
    };

    // Logging in again rotates the stored token.
    LoginUseCase {
        repo: repo.clone(),
        tokens: tokens.clone(),
    }
    .execute(LoginInput {
        email: "admin@example.com".into(),
        password: "Admin123".into(),
    })
    .await
    .unwrap();

    // The superseded session token no longer redeems.
    let refresh = RefreshTokenUseCase { repo, tokens };
    let result = refresh.execute(&earlier).await;
    assert!(
        matches!(result, Err(ApiError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_reveal_whether_the_email_or_the_password_was_wrong() {
    let repo = MockUserRepo::empty();
    seed_default_users(&repo, TEST_COST).await.unwrap();

    let login = LoginUseCase {
        repo,
        tokens: test_token_config(),
    };
    let wrong_password = login
        .execute(LoginInput {
            email: "admin@example.com".into(),
            password: "NotThePass1".into(),
        })
        .await
        .unwrap_err();
    let unknown_email = login
        .execute(LoginInput {
            email: "ghost@example.com".into(),
            password: "Admin123".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, ApiError::InvalidCredentials));
    assert!(matches!(unknown_email, ApiError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

// ── Request pipeline ordering over HTTP ──────────────────────────────────────

#[tokio::test]
async fn should_authenticate_then_authorize_then_validate() {
    let (server, tokens) = test_server();

    // No token: 401 regardless of the rest of the request.
    let response = server.get("/v1/users?limit=oops").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["message"],
        "Access token is required"
    );

    // Authenticated but not an admin: 403 even though the query is invalid.
    let user_token = access_token(&tokens, UserRole::User);
    let response = server
        .get("/v1/users?limit=oops")
        .add_header(header::AUTHORIZATION, bearer(&user_token))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["message"], "Admin access required");

    // Admin: validation now runs and rejects the query.
    let admin_token = access_token(&tokens, UserRole::Admin);
    let response = server
        .get("/v1/users?limit=oops")
        .add_header(header::AUTHORIZATION, bearer(&admin_token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"]["limit"],
        json!(["Expected a number"])
    );

    // A fully valid request passes every gate and fails only on the
    // disconnected database, as a plain internal error.
    let response = server
        .get("/v1/users")
        .add_header(header::AUTHORIZATION, bearer(&admin_token))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["message"], "Internal server error");
}

#[tokio::test]
async fn should_distinguish_expired_tokens_from_invalid_ones() {
    let (server, tokens) = test_server();

    let now = Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: uuid::Uuid::now_v7().to_string(),
        email: "admin@example.com".into(),
        role: UserRole::Admin,
        kind: TokenKind::Access,
        iat: now - 7200,
        exp: now - 3600,
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(tokens.access_secret.as_bytes()),
    )
    .unwrap();

    let response = server
        .get("/v1/users")
        .add_header(header::AUTHORIZATION, bearer(&expired))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Token expired");

    let response = server
        .get("/v1/users")
        .add_header(header::AUTHORIZATION, bearer("not-a-jwt"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid token");
}

#[tokio::test]
async fn should_reject_a_garbage_refresh_token_over_http() {
    let (server, _) = test_server();

    let response = server
        .post("/v1/auth/refresh")
        .json(&json!({"refreshToken": "garbage"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid token");
}
