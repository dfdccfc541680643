//! Review Desk
//!
//! A small account and product-review API providing:
//! - User signup with store-enforced email uniqueness
//! - Login with Argon2id password verification and a 1-hour JWT
//! - Review submission with field validation
//! - Review listing per product, most recent first
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing login tokens (required, min 32 chars)
//! - `JWT_EXPIRATION` - Token lifetime in seconds (default: 3600)
//! - `DATABASE_URL` - PostgreSQL connection string (in-memory stores when unset)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `BIND_ADDR` - Listen address (default: "0.0.0.0:3000")
//! - `ARGON2_MEMORY_COST` / `ARGON2_TIME_COST` / `ARGON2_PARALLELISM` - Hash cost
//!
//! # Usage
//!
//! ```rust,ignore
//! use review_desk::{build_app, AppConfig, Stores};
//!
//! let config = AppConfig::from_env()?;
//! let app = build_app(&config, Stores::memory())?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ApiError, StoreError};
pub use models::*;
pub use password::PasswordHasher;
pub use service::{AuthService, ReviewService};
pub use store::{ReviewStore, Stores, UserStore};
pub use token::TokenIssuer;

use axum::Router;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub reviews: Arc<ReviewService>,
}

impl AppState {
    /// Wire services over the given stores
    pub fn new(config: &AppConfig, stores: Stores) -> Result<Self, ApiError> {
        let hasher = PasswordHasher::new(
            config.argon2_memory_cost,
            config.argon2_time_cost,
            config.argon2_parallelism,
        )?;
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_expiration);

        Ok(Self {
            auth: Arc::new(AuthService::new(stores.users, hasher, tokens)),
            reviews: Arc::new(ReviewService::new(stores.reviews)),
        })
    }
}

/// Validate the configuration and build the router
pub fn build_app(config: &AppConfig, stores: Stores) -> Result<Router, ApiError> {
    config.validate()?;
    let state = AppState::new(config, stores)?;
    Ok(handlers::create_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            database_url: None,
            database_max_connections: 1,
            bind_addr: "127.0.0.1:0".into(),
            jwt_secret: "s".repeat(32),
            jwt_expiration: 3600,
            argon2_memory_cost: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_build_app() {
        assert!(build_app(&config(), Stores::memory()).is_ok());
    }

    #[test]
    fn test_build_app_rejects_invalid_config() {
        let config = AppConfig {
            jwt_secret: "short".into(),
            ..config()
        };
        assert!(matches!(
            build_app(&config, Stores::memory()),
            Err(ApiError::Config(_))
        ));
    }
}
