//! Ownership checks. Read-only; never mutates the store.
//!
//! A resource that does not exist and a resource owned by someone else are
//! indistinguishable here: both are `NotAuthorized`. A missing principal is
//! reported separately as `PrincipalNotFound` so diagnostics can tell the
//! two apart, even though the boundary answers both the same way.

use rusqlite::Connection;
use scribe_db::queries;
use scribe_types::{ArticleId, CommentId, UserId};
use tracing::debug;

use crate::error::{BlogError, Result};

pub fn authorize_article(conn: &Connection, user: UserId, article: ArticleId) -> Result<()> {
    if !queries::user_exists(conn, user)? {
        return Err(BlogError::PrincipalNotFound);
    }
    if !queries::article_owned_by(conn, article, user)? {
        return Err(BlogError::NotAuthorized);
    }
    Ok(())
}

pub fn authorize_comment(conn: &Connection, user: UserId, comment: CommentId) -> Result<()> {
    if !queries::user_exists(conn, user)? {
        return Err(BlogError::PrincipalNotFound);
    }
    if !queries::comment_authored_by(conn, comment, user)? {
        return Err(BlogError::NotAuthorized);
    }
    Ok(())
}

/// Collapse an authorization outcome to a yes/no answer. Both denial kinds
/// become `false`; storage faults still propagate.
pub(crate) fn as_ownership(outcome: Result<()>, user: UserId, resource: &str) -> Result<bool> {
    match outcome {
        Ok(()) => Ok(true),
        Err(BlogError::PrincipalNotFound) => {
            debug!(user_id = %user, resource, "ownership denied: principal does not exist");
            Ok(false)
        }
        Err(BlogError::NotAuthorized) => {
            debug!(user_id = %user, resource, "ownership denied: not owned by principal");
            Ok(false)
        }
        Err(other) => Err(other),
    }
}
