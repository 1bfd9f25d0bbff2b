use std::sync::Arc;

use anyhow::Context;
use storage::{
    Database,
    repository::{AthleteRepository, InMemoryAthleteStore},
};
use utoipa::OpenApi;

mod app;
mod config;
mod error;
mod extract;
mod features;
mod middleware;
mod state;

use config::Config;
use state::SharedStore;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::athletes::handlers::list_athletes,
        features::athletes::handlers::list_all_athletes,
        features::athletes::handlers::get_athlete,
        features::athletes::handlers::create_athlete,
        features::athletes::handlers::update_athlete,
        features::athletes::handlers::delete_athlete,
    ),
    components(
        schemas(
            storage::dto::athlete::AthleteRequest,
            storage::dto::athlete::AthleteResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "athletes", description = "Athlete management API with filtering, pagination, and sorting"),
    )
)]
struct ApiDoc;

async fn connect_store(config: &Config) -> anyhow::Result<SharedStore> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, athletes are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryAthleteStore::new()));
    };

    tracing::info!(
        "Connecting to database at: {}",
        database_url.split('@').next_back().unwrap_or("unknown")
    );
    let db = Database::new(database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    Ok(Arc::new(AthleteRepository::new(db.pool().clone())))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting athlete registry API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let store = connect_store(&config).await?;

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let app = app::router(store, &config);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
