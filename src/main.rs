use lms_catalog::{
    AppState, CatalogError,
    config::{AppConfig, Backend, Env},
    create_router,
    repository::{MemoryRepository, PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the repository selected by the configuration. The Postgres backend
/// is migrated before it is handed out.
async fn build_repository(config: &AppConfig) -> Result<RepositoryState, CatalogError> {
    match config.backend {
        Backend::Memory => {
            tracing::warn!("Using the in-memory catalog; data is lost on shutdown.");
            Ok(Arc::new(MemoryRepository::new()) as RepositoryState)
        }
        Backend::Postgres => {
            let db_url = config
                .db_url
                .as_deref()
                .ok_or_else(|| CatalogError::Internal("DATABASE_URL is not set".to_string()))?;
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(db_url)
                .await?;
            let repo = PostgresRepository::new(pool);
            repo.migrate().await?;
            tracing::info!("Database migrations applied.");
            Ok(Arc::new(repo) as RepositoryState)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // RUST_LOG wins over the development default.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lms_catalog=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!(
        "Application starting in {:?} mode with the {:?} backend",
        config.env,
        config.backend
    );

    let repo = build_repository(&config).await?;
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(repo, config));

    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app).await?;
    Ok(())
}
