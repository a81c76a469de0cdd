use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // JWT (admin bearer tokens)
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,

    // Server
    pub host: String,
    pub port: u16,

    // External policy service (preflight proxy target)
    pub policy_service_url: String,

    // Optional directory of registry connector specs imported at startup
    pub registry_dir: Option<String>,

    // Optional 32-byte hex key for encrypting auth config secrets at rest
    pub encryption_key: Option<String>,

    // Allowed CORS origins for the admin console
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            // JWT
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("JWT_EXPIRATION_HOURS"))?,

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8082".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,

            // Preflight lives on the policy service, not the connector service
            policy_service_url: env::var("POLICY_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8083".to_string()),

            registry_dir: env::var("REGISTRY_DIR").ok().filter(|v| !v.trim().is_empty()),

            encryption_key: env::var("SECRETS_ENCRYPTION_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            cors_origins: env::var("ADMIN_CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3001".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
