//! Data Models
//!
//! Database entities, request/response DTOs and token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

// ============================================
// Database Entities
// ============================================

/// User entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Product review entity from database
///
/// `user_name` is free text and is not linked to any [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub product_id: String,
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;

    pub fn rating_in_bounds(rating: i32) -> bool {
        (Self::MIN_RATING..=Self::MAX_RATING).contains(&rating)
    }
}

// ============================================
// Request DTOs
// ============================================

/// Signup request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"), custom(function = "not_blank"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request
///
/// Carries no format validation so that a malformed email is
/// indistinguishable from an unknown one.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Review submission
///
/// Every field is optional at the wire level so that absent fields are
/// reported by name instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[validate(required, length(min = 1), custom(function = "not_blank"))]
    pub product_id: Option<String>,

    #[validate(required, length(min = 1), custom(function = "not_blank"))]
    pub user_name: Option<String>,

    #[validate(required, range(min = 1, max = 5))]
    pub rating: Option<i32>,

    #[validate(required, length(min = 1), custom(function = "not_blank"))]
    pub comment: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Collect the offending field names from validator output, in wire
/// (camelCase) spelling and sorted for stable responses.
pub fn invalid_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| to_camel_case(field))
        .collect();
    fields.sort();
    fields.dedup();
    fields
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================
// Response DTOs
// ============================================

/// Minimal identity returned after signup (no password material)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Signup response
#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Login response with the issued token
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    pub message: String,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================
// JWT Claims
// ============================================

/// Claims carried by the login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_request() -> CreateReviewRequest {
        CreateReviewRequest {
            product_id: Some("X".into()),
            user_name: Some("ann".into()),
            rating: Some(4),
            comment: Some("solid".into()),
        }
    }

    #[test]
    fn test_review_request_valid() {
        assert!(review_request().validate().is_ok());
    }

    #[test]
    fn test_review_request_reports_missing_fields() {
        let errors = CreateReviewRequest::default().validate().unwrap_err();
        assert_eq!(
            invalid_fields(&errors),
            vec!["comment", "productId", "rating", "userName"]
        );
    }

    #[test]
    fn test_review_request_rejects_blank_comment() {
        let req = CreateReviewRequest {
            comment: Some("   ".into()),
            ..review_request()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(invalid_fields(&errors), vec!["comment"]);
    }

    #[test]
    fn test_review_request_rating_bounds() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let req = CreateReviewRequest {
                rating: Some(rating),
                ..review_request()
            };
            assert_eq!(req.validate().is_ok(), ok, "rating {rating}");
        }
    }

    #[test]
    fn test_signup_request_requires_password() {
        let req = SignupRequest {
            name: None,
            email: "ann@x.com".into(),
            password: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(invalid_fields(&errors), vec!["password"]);
    }

    #[test]
    fn test_signup_request_checks_presence_only() {
        let req = SignupRequest {
            name: None,
            email: "not-an-email".into(),
            password: "pw".into(),
        };
        assert!(req.validate().is_ok());

        let blank = SignupRequest {
            email: "  ".into(),
            ..req
        };
        let errors = blank.validate().unwrap_err();
        assert_eq!(invalid_fields(&errors), vec!["email"]);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: Some("Ann".into()),
            email: "ann@x.com".into(),
            password_hash: "$argon2id$...".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_review_serializes_camel_case() {
        let review = Review {
            id: Uuid::new_v4(),
            product_id: "X".into(),
            user_name: "ann".into(),
            rating: 5,
            comment: "great".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["productId"], "X");
        assert_eq!(json["userName"], "ann");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("product_id"), "productId");
        assert_eq!(to_camel_case("productId"), "productId");
        assert_eq!(to_camel_case("rating"), "rating");
    }
}
