use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sqlx::postgres::PgPool;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{PolicyClient, SecretCipher};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// SeaORM database connection (primary for queries)
    pub db: DatabaseConnection,
    /// SQLx pool for migrations only
    pub pg_pool: PgPool,
    /// Outbound client for the policy service
    pub policy: PolicyClient,
    /// Cipher for auth config secrets at rest
    pub secrets: SecretCipher,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState by connecting to the database and running migrations
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        // Connect to PostgreSQL with SQLx (for migrations)
        let pg_pool = PgPool::connect(&config.database_url)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .map_err(|e| AppStateError::Migration(e.to_string()))?;

        // Connect to PostgreSQL with SeaORM
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(100)
            .min_connections(5)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        let http = reqwest::Client::new();
        let policy = PolicyClient::new(http, &config.policy_service_url);
        let secrets = SecretCipher::from_hex_key(config.encryption_key.as_deref())
            .map_err(|e| AppStateError::Secrets(e.to_string()))?;

        Ok(Self {
            db,
            pg_pool,
            policy,
            secrets,
            config,
        })
    }

    /// Import registry specs from the configured directory, if any.
    /// Failures are logged, not fatal; the registry can still be fed through
    /// the upsert endpoint.
    pub async fn import_registry(&self) -> AppResult<usize> {
        match &self.config.registry_dir {
            Some(dir) => crate::services::registry_import::import_from_dir(&self.db, dir).await,
            None => Ok(0),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("PostgreSQL connection error: {0}")]
    Postgres(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Secrets key error: {0}")]
    Secrets(String),
}
