use anyhow::{Context, Result};
use std::env;
use tracing::info;

use storefront_backend::config::AppConfig;
use storefront_backend::database::Database;
use storefront_backend::repositories::Repositories;
use storefront_backend::seed::CatalogSeed;
use storefront_backend::services::CatalogService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let database_url = config
        .database_url()
        .context("DATABASE_URL environment variable is required")?;

    let database = Database::new(database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("up");

    match command {
        "up" => {
            info!("Running database migrations...");
            database.migrate().await.context("Failed to apply migrations")?;
            info!("Database migrations completed successfully");
        }
        "status" => {
            show_migration_status(&database).await?;
        }
        "seed" => {
            let path = args
                .get(2)
                .context("Usage: migrate seed <fixture.json>")?;
            database.migrate().await.context("Failed to apply migrations")?;

            let seed = CatalogSeed::load_file(path)
                .with_context(|| format!("Failed to read fixture: {}", path))?;
            let catalog = CatalogService::new(Repositories::postgres(database.pool().clone()));
            let report = seed.apply(&catalog).await.context("Failed to seed catalog")?;

            println!(
                "Seeded {} categories, {} products ({} already present)",
                report.categories_created, report.products_created, report.skipped
            );
        }
        _ => {
            eprintln!("Usage: migrate [up|status|seed <file>]");
            eprintln!("  up      - Run all pending migrations (default)");
            eprintln!("  status  - Show migration status");
            eprintln!("  seed    - Load a catalog fixture (JSON)");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn show_migration_status(database: &Database) -> Result<()> {
    let tracked: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(database.pool())
            .await
            .context("Failed to inspect migrations table")?;

    let applied: Vec<i64> = if tracked {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(database.pool())
            .await
            .context("Failed to fetch applied migrations")?
    } else {
        Vec::new()
    };

    println!("Migration Status:");
    println!("================");

    for migration in Database::migrator().iter() {
        let status = if applied.contains(&migration.version) {
            "APPLIED"
        } else {
            "PENDING"
        };
        println!("{:<16} {:<8} {}", migration.version, status, migration.description);
    }

    Ok(())
}
