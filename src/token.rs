//! Login Tokens
//!
//! Issues signed, time-limited HS256 tokens whose only claim beyond the
//! registered timestamps is the user's id. No route verifies them.

use crate::error::ApiError;
use crate::models::TokenClaims;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// A freshly signed token together with its lifetime
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Signs login tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, expiration: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration,
        }
    }

    /// Sign a token for the given user
    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration);

        let claims = TokenClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            expires_in: self.expiration,
        })
    }

    /// Decode and check a token's signature and expiry.
    ///
    /// Only used by tooling and tests; requests are never gated on it.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}
