use actix_web::{App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use storefront_backend::config::{AppConfig, StorageBackend};
use storefront_backend::database::Database;
use storefront_backend::error::AppError;
use storefront_backend::handlers;
use storefront_backend::middleware::{SessionMiddleware, SessionSettings};
use storefront_backend::repositories::Repositories;
use storefront_backend::seed::CatalogSeed;
use storefront_backend::services::AppServices;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting storefront on {}:{}", config.host, config.port);

    let repositories = match config.storage {
        StorageBackend::Postgres => {
            let database =
                Database::new(config.database_url()?, config.database_max_connections).await?;
            database.migrate().await?;
            Repositories::postgres(database.pool().clone())
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on shutdown");
            Repositories::in_memory()
        }
    };

    let services = AppServices::new(repositories);

    if let Some(path) = &config.seed_file {
        info!("Loading catalog fixture from {}", path);
        CatalogSeed::load_file(path)?.apply(&services.catalog).await?;
    }

    let session_settings = SessionSettings {
        cookie_name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
    };

    HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(session_settings.clone()))
            .wrap(TracingLogger::default())
            .configure(|cfg| handlers::configure(cfg, &services))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
