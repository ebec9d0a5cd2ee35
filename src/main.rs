use sqlx::postgres::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handraise::account::repository::PostgresAccountRepository;
use handraise::attendance::repository::PostgresAttendanceRepository;
use handraise::event::repository::PostgresEventRepository;
use handraise::{router, AppState, TokenConfig};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handraise=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting volunteer coordination server");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/handraise".to_string());

    // The pool connects on first use and is shared across all requests
    let pool = PgPool::connect_lazy(&database_url).expect("Failed to create database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let app_state = AppState::new(
        Arc::new(PostgresAccountRepository::new(pool.clone())),
        Arc::new(PostgresEventRepository::new(pool.clone())),
        Arc::new(PostgresAttendanceRepository::new(pool)),
        TokenConfig::new(),
    );

    let app = router(app_state).layer(TraceLayer::new_for_http());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    info!("Server running on http://localhost:{}", port);
    axum::serve(listener, app).await.unwrap();
}
