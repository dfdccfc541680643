//! Password Hashing
//!
//! Salted one-way hashing with Argon2id. Hashes are stored as PHC strings,
//! which embed the salt and cost parameters used to produce them.

use crate::error::ApiError;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Argon2id hasher configured with a fixed cost
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with the given memory (KiB), time and parallelism costs
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Result<Self, ApiError> {
        let params = Params::new(memory_cost, time_cost, parallelism, None)
            .map_err(|e| ApiError::Config(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash.
    ///
    /// The parameters embedded in `hash` are honoured, so hashes produced
    /// under an earlier cost configuration still verify.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::error!("Stored password hash is unreadable: {:?}", e);
            ApiError::Internal
        })?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_verify_round_trip() {
        let hasher = hasher();
        let hash = hasher.hash("secret123").unwrap();

        assert!(hasher.verify("secret123", &hash).unwrap());
        assert!(!hasher.verify("secret124", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = hasher().hash("secret123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret123"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_uses_embedded_parameters() {
        let old = PasswordHasher::new(2048, 2, 1).unwrap();
        let hash = old.hash("secret123").unwrap();

        assert!(hasher().verify("secret123", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            hasher().verify("secret123", "not-a-phc-string"),
            Err(ApiError::Internal)
        ));
    }

    #[test]
    fn test_invalid_params_are_config_errors() {
        assert!(matches!(
            PasswordHasher::new(1, 1, 1),
            Err(ApiError::Config(_))
        ));
    }
}
