use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub session_cookie_name: String,
    pub cookie_secure: bool,
    pub seed_file: Option<String>,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(config::Environment::default())
    }

    fn load<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("storage", "memory")?
            .set_default("database_max_connections", 10)?
            .set_default("session_cookie_name", storefront_shared::DEFAULT_SESSION_COOKIE)?
            .set_default("cookie_secure", false)?
            .set_default("log_filter", "info")?
            .add_source(source)
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        if config.storage == StorageBackend::Postgres && config.database_url.is_none() {
            return Err(config::ConfigError::Message(
                "database_url is required when storage = postgres".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn database_url(&self) -> Result<&str, config::ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| config::ConfigError::NotFound("database_url".to_string()))
    }
}
