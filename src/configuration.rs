use config::{ConfigError, Environment, File};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Directory with the built client bundle, served at `/` when set
    pub static_dir: Option<String>,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }

    /// Builds the pool handed to the HTTP server. Connections are opened lazily.
    pub fn connection_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_seconds))
            .connect_lazy(&self.connection_string())
    }
}

/// JWT signing and lifetime settings
#[derive(serde::Deserialize, Clone, Debug)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds (3600 = 1 hour)
    pub refresh_token_expiry: i64,  // seconds (604800 = 7 days)
    pub issuer: String,
}

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct CorsSettings {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Loads settings from built-in defaults, an optional `configuration.{yaml,toml,json}`
/// file and `APP_`-prefixed environment variables (`APP_JWT__SECRET=...`), in that order.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 5000)?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.username", "postgres")?
        .set_default("database.password", "password")?
        .set_default("database.database_name", "taskboard")?
        .set_default("database.max_connections", 5)?
        .set_default("database.acquire_timeout_seconds", 5)?
        .set_default("jwt.access_token_expiry", 3600)?
        .set_default("jwt.refresh_token_expiry", 604800)?
        .set_default("jwt.issuer", "taskboard")?
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("app")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
