use std::sync::Arc;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use siakad_api::config::ApiConfig;
use siakad_api::router::{RouteTable, build_router};
use siakad_api::seed::seed_default_users;
use siakad_api::state::AppState;
use siakad_api_migration::Migrator;

#[tokio::main]
async fn main() {
    siakad_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");

    let state = AppState {
        db,
        http: reqwest::Client::new(),
        tokens: config.token_config(),
        bcrypt_cost: config.bcrypt_cost,
        student_data_url: config.student_data_url.clone(),
        routes: Arc::new(RouteTable::new()),
    };

    seed_default_users(&state.user_repo(), state.bcrypt_cost)
        .await
        .expect("failed to seed default accounts");

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
