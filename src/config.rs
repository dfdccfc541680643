//! Application Configuration
//!
//! All configuration values are loaded from environment variables.
//! No hardcoded secrets or sensitive data.

use crate::error::ApiError;
use std::env;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string (from DATABASE_URL env var).
    /// When absent the in-memory stores are used.
    pub database_url: Option<String>,

    /// Maximum pooled connections (from DATABASE_MAX_CONNECTIONS env var)
    pub database_max_connections: u32,

    /// Listen address (from BIND_ADDR env var)
    pub bind_addr: String,

    /// JWT secret key for signing login tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// Login token lifetime in seconds (from JWT_EXPIRATION env var)
    pub jwt_expiration: i64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ApiError> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ApiError::Config("JWT_SECRET environment variable must be set".into()))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),

            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10),

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            jwt_secret,

            jwt_expiration: parse_var("JWT_EXPIRATION", 3600), // 1 hour

            argon2_memory_cost: parse_var("ARGON2_MEMORY_COST", 19456), // 19 MiB

            argon2_time_cost: parse_var("ARGON2_TIME_COST", 2),

            argon2_parallelism: parse_var("ARGON2_PARALLELISM", 1),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.jwt_secret.len() < 32 {
            return Err(ApiError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.jwt_expiration <= 0 {
            return Err(ApiError::Config("JWT_EXPIRATION must be positive".to_string()));
        }

        if self.database_max_connections == 0 {
            return Err(ApiError::Config(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
