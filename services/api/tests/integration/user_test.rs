use chrono::{Duration, Utc};

use siakad_api::domain::types::UserFilter;
use siakad_api::error::ApiError;
use siakad_api::seed::seed_default_users;
use siakad_api::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, GetUsersUseCase,
    UpdateUserInput, UpdateUserUseCase,
};
use siakad_domain::pagination::PageRequest;
use siakad_domain::role::UserRole;

use crate::helpers::{MockUserRepo, TEST_COST, test_user};

#[tokio::test]
async fn should_run_the_full_admin_account_lifecycle() {
    let repo = MockUserRepo::empty();
    seed_default_users(&repo, TEST_COST).await.unwrap();

    // Create a new account.
    let created = CreateUserUseCase {
        repo: repo.clone(),
        bcrypt_cost: TEST_COST,
    }
    .execute(CreateUserInput {
        email: "budi@example.com".into(),
        name: Some("Budi".into()),
        password: "Secret12".into(),
        role: UserRole::User,
    })
    .await
    .unwrap();

    // It shows up in a filtered listing.
    let (users, meta) = GetUsersUseCase { repo: repo.clone() }
        .execute(
            UserFilter {
                email: Some("budi".into()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(meta.total_items, 1);
    assert_eq!(users[0].id, created.id);

    // Fetch by id.
    let fetched = GetUserUseCase { repo: repo.clone() }
        .execute(created.id)
        .await
        .unwrap();
    assert_eq!(fetched.email, "budi@example.com");

    // Update name and role.
    let updated = UpdateUserUseCase {
        repo: repo.clone(),
        bcrypt_cost: TEST_COST,
    }
    .execute(
        created.id,
        UpdateUserInput {
            email: None,
            name: Some("Budi Revised".into()),
            password: None,
            role: Some(UserRole::Admin),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Budi Revised"));
    assert_eq!(updated.role, UserRole::Admin);
    assert!(updated.updated_at >= created.updated_at);

    // Delete, after which the fetch fails.
    DeleteUserUseCase { repo: repo.clone() }
        .execute(created.id)
        .await
        .unwrap();
    let result = GetUserUseCase { repo }.execute(created.id).await;
    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_filter_the_directory_by_role_and_name() {
    let repo = MockUserRepo::empty();
    seed_default_users(&repo, TEST_COST).await.unwrap();
    let list = GetUsersUseCase { repo };

    let (admins, meta) = list
        .execute(
            UserFilter {
                role: Some(UserRole::Admin),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(meta.total_items, 1);
    assert_eq!(admins[0].email, "admin@example.com");

    // Name matching is a case-insensitive substring.
    let (named, _) = list
        .execute(
            UserFilter {
                name: Some("user one".into()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].email, "user1@example.com");
}

#[tokio::test]
async fn should_paginate_newest_first_across_pages() {
    let mut accounts = Vec::new();
    for i in 0..5i64 {
        let mut user = test_user(&format!("u{i}@example.com"), "Secret12", UserRole::User);
        user.created_at = Utc::now() + Duration::seconds(i);
        accounts.push(user);
    }
    let list = GetUsersUseCase {
        repo: MockUserRepo::new(accounts),
    };

    let (page1, meta) = list
        .execute(UserFilter::default(), PageRequest { page: 1, limit: 2 })
        .await
        .unwrap();
    assert_eq!(page1[0].email, "u4@example.com");
    assert_eq!(page1[1].email, "u3@example.com");
    assert_eq!(meta.total_items, 5);
    assert_eq!(meta.total_pages, 3);
    assert!(meta.has_next_page);
    assert!(!meta.has_prev_page);

    // Repeating the query without intervening writes yields the same page.
    let (again, meta_again) = list
        .execute(UserFilter::default(), PageRequest { page: 1, limit: 2 })
        .await
        .unwrap();
    assert_eq!(again, page1);
    assert_eq!(meta_again, meta);

    let (page3, meta) = list
        .execute(UserFilter::default(), PageRequest { page: 3, limit: 2 })
        .await
        .unwrap();
    assert_eq!(page3.len(), 1);
    assert_eq!(page3[0].email, "u0@example.com");
    assert!(!meta.has_next_page);
    assert!(meta.has_prev_page);

    // Past the end: an empty page, not an error.
    let (empty, meta) = list
        .execute(UserFilter::default(), PageRequest { page: 9, limit: 2 })
        .await
        .unwrap();
    assert!(empty.is_empty());
    assert_eq!(meta.total_pages, 3);
}

#[tokio::test]
async fn should_enforce_email_uniqueness_on_create_and_update() {
    let repo = MockUserRepo::empty();
    seed_default_users(&repo, TEST_COST).await.unwrap();

    let result = CreateUserUseCase {
        repo: repo.clone(),
        bcrypt_cost: TEST_COST,
    }
    .execute(CreateUserInput {
        email: "admin@example.com".into(),
        name: None,
        password: "Secret12".into(),
        role: UserRole::User,
    })
    .await;
    assert!(
        matches!(result, Err(ApiError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );

    let user1_id = {
        let users = repo.users_handle();
        let guard = users.lock().unwrap();
        guard
            .iter()
            .find(|u| u.email == "user1@example.com")
            .map(|u| u.id)
            .unwrap()
    };
    let result = UpdateUserUseCase {
        repo,
        bcrypt_cost: TEST_COST,
    }
    .execute(
        user1_id,
        UpdateUserInput {
            email: Some("admin@example.com".into()),
            name: None,
            password: None,
            role: None,
        },
    )
    .await;
    assert!(
        matches!(result, Err(ApiError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}
