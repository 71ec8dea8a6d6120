use scribe_db::{IdentityField, StoreError};
use thiserror::Error;

use crate::hasher::HashError;

/// Every failure a core operation can report.
///
/// The first four variants are the expected domain outcomes. `Storage` and
/// `Hash` carry infrastructure faults so they are never folded into a domain
/// kind by accident.
#[derive(Error, Debug)]
pub enum BlogError {
    /// No user for the given id or email, or credentials did not match.
    #[error("Principal not found")]
    PrincipalNotFound,

    /// No article or comment for the given id.
    #[error("Resource not found")]
    ResourceNotFound,

    /// The principal exists but does not own the targeted resource.
    #[error("Not authorized for this resource")]
    NotAuthorized,

    #[error("Duplicate {0}")]
    DuplicateIdentity(IdentityField),

    #[error("Storage failure: {0}")]
    Storage(#[source] StoreError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The closed set of kinds the boundary layer maps to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PrincipalNotFound,
    ResourceNotFound,
    NotAuthorized,
    DuplicateIdentity,
    Internal,
}

impl BlogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PrincipalNotFound => ErrorKind::PrincipalNotFound,
            Self::ResourceNotFound => ErrorKind::ResourceNotFound,
            Self::NotAuthorized => ErrorKind::NotAuthorized,
            Self::DuplicateIdentity(_) => ErrorKind::DuplicateIdentity,
            Self::Storage(_) | Self::Hash(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for BlogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateIdentity(field) => Self::DuplicateIdentity(field),
            StoreError::NotFound | StoreError::ArticleNotFound => Self::ResourceNotFound,
            StoreError::OwnerNotFound | StoreError::AuthorNotFound => Self::PrincipalNotFound,
            other => Self::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
