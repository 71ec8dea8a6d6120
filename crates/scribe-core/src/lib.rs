//! Ownership and lifecycle rules for users, articles and comments.
//!
//! [`Blog`] is the entry point: every mutation takes the acting principal's
//! id explicitly, runs as one store transaction, and reports failures as a
//! [`BlogError`] from a closed set of kinds.

pub mod error;
pub mod guard;
pub mod hasher;
pub mod lifecycle;

pub use error::{BlogError, ErrorKind, Result};
pub use hasher::{Argon2Hasher, HashError, PasswordHasher, Sha256Hasher};
pub use lifecycle::Blog;
pub use scribe_db::IdentityField;
