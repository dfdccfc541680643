//! Persistence Ports
//!
//! The services only see these traits. Invariants that must survive
//! concurrent writers (email uniqueness, rating bounds) are enforced by the
//! implementations, not by callers checking first.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryReviewStore, MemoryUserStore};
pub use postgres::{ensure_schema, PgReviewStore, PgUserStore};

use crate::error::StoreError;
use crate::models::{Review, User};

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with [`StoreError::DuplicateEmail`] when another record already
    /// holds the same email, even if it was written concurrently.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Review store
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert a review; ratings outside 1..=5 are rejected with
    /// [`StoreError::ConstraintViolation`].
    async fn insert(&self, review: &Review) -> Result<(), StoreError>;

    /// All reviews for `product_id`, most recent first
    async fn list_by_product(&self, product_id: &str) -> Result<Vec<Review>, StoreError>;
}

/// Store handles injected into the services
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub reviews: Arc<dyn ReviewStore>,
}

impl Stores {
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            reviews: Arc::new(MemoryReviewStore::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            reviews: Arc::new(PgReviewStore::new(pool)),
        }
    }
}
