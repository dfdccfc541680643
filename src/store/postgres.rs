//! PostgreSQL Stores

use super::{ReviewStore, UserStore};
use crate::error::StoreError;
use crate::models::{Review, User};

use async_trait::async_trait;
use sqlx::PgPool;

const USERS_EMAIL_CONSTRAINT: &str = "users_email_unique";
const REVIEWS_RATING_CONSTRAINT: &str = "reviews_rating_range";

/// Wire field guarded by a named table constraint
fn field_for_constraint(constraint: &str) -> &str {
    match constraint {
        REVIEWS_RATING_CONSTRAINT => "rating",
        USERS_EMAIL_CONSTRAINT => "email",
        other => other,
    }
}

/// Create tables and indexes if they do not exist yet
pub async fn ensure_schema(db: &PgPool) -> Result<(), StoreError> {
    tracing::info!("Ensuring database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name TEXT,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT users_email_unique UNIQUE (email)
        );
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            seq BIGSERIAL UNIQUE,
            id UUID PRIMARY KEY,
            product_id TEXT NOT NULL,
            user_name TEXT NOT NULL,
            rating INTEGER NOT NULL,
            comment TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT reviews_rating_range CHECK (rating BETWEEN 1 AND 5)
        );
        "#,
    )
    .execute(db)
    .await?;

    // Free text is unbounded; widen columns left over from older bootstraps
    sqlx::query(
        r#"
        ALTER TABLE users
            ALTER COLUMN name TYPE TEXT,
            ALTER COLUMN email TYPE TEXT,
            ALTER COLUMN password_hash TYPE TEXT;
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        ALTER TABLE reviews
            ALTER COLUMN product_id TYPE TEXT,
            ALTER COLUMN user_name TYPE TEXT;
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_reviews_product_recent ON reviews(product_id, created_at DESC, seq DESC);",
    )
    .execute(db)
    .await?;

    tracing::info!("Database schema ready");
    Ok(())
}

/// Users table backed credential store
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(USERS_EMAIL_CONSTRAINT)
                {
                    return StoreError::DuplicateEmail;
                }
            }
            StoreError::from(err)
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}

/// Reviews table backed review store
pub struct PgReviewStore {
    db: PgPool,
}

impl PgReviewStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert(&self, review: &Review) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, product_id, user_name, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id)
        .bind(&review.product_id)
        .bind(&review.user_name)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&self.db)
        .await
        .map_err(|err| match StoreError::from(err) {
            StoreError::ConstraintViolation(constraint) => {
                StoreError::ConstraintViolation(field_for_constraint(&constraint).to_string())
            }
            other => other,
        })?;

        Ok(())
    }

    async fn list_by_product(&self, product_id: &str) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, product_id, user_name, rating, comment, created_at
            FROM reviews
            WHERE product_id = $1
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(reviews)
    }
}
