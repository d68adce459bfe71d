use sqlx::migrate::Migrator;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;
use crate::error::AppError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Migrations embedded in the binary, in version order.
    pub fn migrator() -> &'static Migrator {
        &MIGRATOR
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
