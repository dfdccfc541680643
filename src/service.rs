//! Account and Review Services
//!
//! Stateless orchestration over the injected stores.

use crate::error::ApiError;
use crate::models::*;
use crate::password::PasswordHasher;
use crate::store::{ReviewStore, UserStore};
use crate::token::TokenIssuer;

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Authentication service
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user
    pub async fn signup(&self, req: SignupRequest) -> Result<UserSummary, ApiError> {
        req.validate().map_err(|e| {
            tracing::debug!("Signup rejected: {}", e);
            ApiError::Validation(invalid_fields(&e))
        })?;

        // Fast path only; the store's uniqueness constraint is authoritative
        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = self.hash_password(req.password).await?;

        let user = User {
            id: Uuid::new_v4(),
            name: req.name.filter(|n| !n.trim().is_empty()),
            email: req.email,
            password_hash,
            created_at: Utc::now(),
        };

        self.users.insert(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(UserSummary::from(&user))
    }

    /// Attempt to login a user
    ///
    /// Unknown email and wrong password yield the same error.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResult, ApiError> {
        let user = match self.users.find_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login failed");
                return Err(ApiError::InvalidCredentials);
            }
        };

        if !self
            .verify_password(req.password, user.password_hash.clone())
            .await?
        {
            tracing::debug!("Login failed");
            return Err(ApiError::InvalidCredentials);
        }

        let issued = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthResult {
            message: "Login successful".to_string(),
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        })
    }

    // Argon2 is CPU bound; keep it off the async workers

    async fn hash_password(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!("Hashing task failed: {:?}", e);
                ApiError::Internal
            })?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!("Verification task failed: {:?}", e);
                ApiError::Internal
            })?
    }
}

/// Review service
pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewStore>) -> Self {
        Self { reviews }
    }

    /// Create a review
    pub async fn create(&self, req: CreateReviewRequest) -> Result<Review, ApiError> {
        req.validate().map_err(|e| {
            tracing::debug!("Review rejected: {}", e);
            ApiError::Validation(invalid_fields(&e))
        })?;

        let (Some(product_id), Some(user_name), Some(rating), Some(comment)) =
            (req.product_id, req.user_name, req.rating, req.comment)
        else {
            return Err(ApiError::Internal);
        };

        let review = Review {
            id: Uuid::new_v4(),
            product_id,
            user_name,
            rating,
            comment,
            created_at: Utc::now(),
        };

        self.reviews.insert(&review).await?;

        tracing::info!(review_id = %review.id, product_id = %review.product_id, "Review created");
        Ok(review)
    }

    /// List reviews for a product, most recent first
    pub async fn list(&self, product_id: &str) -> Result<Vec<Review>, ApiError> {
        Ok(self.reviews.list_by_product(product_id).await?)
    }
}
