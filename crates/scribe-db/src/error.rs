use std::fmt;

use thiserror::Error;

/// Which unique identity column a write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Email,
    Username,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Username => f.write_str("username"),
        }
    }
}

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A UNIQUE constraint on users rejected the write.
    #[error("Duplicate {0}")]
    DuplicateIdentity(IdentityField),

    /// The targeted row does not exist.
    #[error("Record not found")]
    NotFound,

    #[error("Owning user not found")]
    OwnerNotFound,

    #[error("Article not found")]
    ArticleNotFound,

    #[error("Comment author not found")]
    AuthorNotFound,

    /// A stored value could not be decoded (bad uuid or timestamp).
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("DB lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Translate a failed insert/update on `users` into `DuplicateIdentity` when
/// SQLite reports a UNIQUE violation, otherwise keep the raw error.
pub(crate) fn map_identity_conflict(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref code, Some(ref msg)) = err {
        if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            if msg.contains("users.email") {
                return StoreError::DuplicateIdentity(IdentityField::Email);
            }
            if msg.contains("users.username") {
                return StoreError::DuplicateIdentity(IdentityField::Username);
            }
        }
    }
    StoreError::Sqlite(err)
}
