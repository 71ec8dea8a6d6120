//! Pluggable one-way password hashing.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Password hashing failed: {0}")]
pub struct HashError(String);

/// One-way function over passwords. The core never sees or stores the
/// plaintext after calling [`PasswordHasher::hash`].
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Whether `password` produces `stored`. The default compares outputs of
    /// [`PasswordHasher::hash`], which only works for unsalted functions.
    fn verify(&self, password: &str, stored: &str) -> bool {
        matches!(self.hash(password), Ok(hashed) if hashed == stored)
    }
}

/// Unsalted SHA-256, base64 encoded. Deterministic, so hash outputs can be
/// compared directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        Ok(B64.encode(Sha256::digest(password.as_bytes())))
    }
}

/// Argon2id with a random salt per hash, stored as a PHC string.
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| HashError(e.to_string()))
    }

    // Salted, so the stored PHC string carries the parameters to re-derive.
    fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
