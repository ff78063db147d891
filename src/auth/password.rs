use bcrypt::{hash, verify};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("password does not match")]
    Mismatch,
}

/// bcrypt password hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. Every call draws a fresh salt, so hashing the
    /// same password twice yields different strings.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        hash(plaintext, self.cost).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Verify a plaintext password against a stored bcrypt hash.
    pub fn verify(&self, stored_hash: &str, plaintext: &str) -> Result<(), PasswordError> {
        match verify(plaintext, stored_hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Hash(e.to_string())),
        }
    }
}
