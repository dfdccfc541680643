//! In-memory Stores
//!
//! Used as injected test doubles and when no database is configured.
//! Each write holds the lock for the whole check-and-insert, so the same
//! invariants hold as with the Postgres constraints.

use super::{ReviewStore, UserStore};
use crate::error::StoreError;
use crate::models::{Review, User};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Credential store keyed by email
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write();
        if users.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(email).cloned())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.users.read().len() as i64)
    }
}

/// Review store in insertion order
#[derive(Default)]
pub struct MemoryReviewStore {
    reviews: RwLock<Vec<Review>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, review: &Review) -> Result<(), StoreError> {
        if !Review::rating_in_bounds(review.rating) {
            return Err(StoreError::ConstraintViolation("rating".to_string()));
        }
        self.reviews.write().push(review.clone());
        Ok(())
    }

    async fn list_by_product(&self, product_id: &str) -> Result<Vec<Review>, StoreError> {
        // Newest insert first, then a stable sort keeps that order on ties
        let mut matches: Vec<Review> = self
            .reviews
            .read()
            .iter()
            .rev()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use uuid::Uuid;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: None,
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            created_at: Utc::now(),
        }
    }

    fn review(product_id: &str, rating: i32, minutes_ago: i64) -> Review {
        Review {
            id: Uuid::new_v4(),
            product_id: product_id.to_string(),
            user_name: "ann".to_string(),
            rating,
            comment: "fine".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.insert(&user("ann@x.com")).await.unwrap();

        assert_eq!(
            store.insert(&user("ann@x.com")).await,
            Err(StoreError::DuplicateEmail)
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_same_email_keep_one() {
        let store = Arc::new(MemoryUserStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert(&user("race@x.com")).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(e) => assert_eq!(e, StoreError::DuplicateEmail),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email_is_exact() {
        let store = MemoryUserStore::new();
        store.insert(&user("ann@x.com")).await.unwrap();

        assert!(store.find_by_email("ann@x.com").await.unwrap().is_some());
        assert!(store.find_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rating_bounds_enforced() {
        let store = MemoryReviewStore::new();

        assert!(matches!(
            store.insert(&review("X", 0, 0)).await,
            Err(StoreError::ConstraintViolation(_))
        ));
        assert!(matches!(
            store.insert(&review("X", 6, 0)).await,
            Err(StoreError::ConstraintViolation(_))
        ));
        assert!(store.list_by_product("X").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = MemoryReviewStore::new();
        let t1 = review("X", 1, 30);
        let t3 = review("X", 3, 10);
        let t2 = review("X", 2, 20);
        let other = review("Y", 4, 5);

        for r in [&t1, &t3, &t2, &other] {
            store.insert(r).await.unwrap();
        }

        let listed = store.list_by_product("X").await.unwrap();
        assert_eq!(listed, vec![t3, t2, t1]);
    }

    #[tokio::test]
    async fn test_list_ties_return_latest_insert_first() {
        let store = MemoryReviewStore::new();
        let mut first = review("X", 5, 0);
        let mut second = review("X", 4, 0);
        second.created_at = first.created_at;
        first.comment = "first".into();
        second.comment = "second".into();

        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        let listed = store.list_by_product("X").await.unwrap();
        assert_eq!(listed[0].comment, "second");
        assert_eq!(listed[1].comment, "first");
    }
}
