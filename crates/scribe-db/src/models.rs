//! Database row types. These map directly to SQLite rows and are converted
//! into the scribe-types entities at the edge of this crate.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;
use scribe_types::{Article, Comment, User};
use uuid::Uuid;

use crate::error::{Result, StoreError};

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

pub struct ArticleRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

pub struct CommentRow {
    pub id: String,
    pub article_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl UserRow {
    pub(crate) const COLUMNS: &'static str =
        "id, email, password_hash, username, created_at, updated_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            username: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl ArticleRow {
    pub(crate) const COLUMNS: &'static str =
        "id, owner_id, title, content, created_at, updated_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl CommentRow {
    pub(crate) const COLUMNS: &'static str =
        "id, article_id, author_id, content, created_at, updated_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            article_id: row.get(1)?,
            author_id: row.get(2)?,
            content: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            email: row.email,
            password_hash: row.password_hash,
            username: row.username,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: row.updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

impl TryFrom<ArticleRow> for Article {
    type Error = StoreError;

    fn try_from(row: ArticleRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            owner_id: parse_id(&row.owner_id)?,
            title: row.title,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: row.updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

impl TryFrom<CommentRow> for Comment {
    type Error = StoreError;

    fn try_from(row: CommentRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            article_id: parse_id(&row.article_id)?,
            author_id: parse_id(&row.author_id)?,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: row.updated_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

fn parse_id<T: From<Uuid>>(raw: &str) -> Result<T> {
    Uuid::parse_str(raw)
        .map(T::from)
        .map_err(|e| StoreError::Corrupt(format!("bad id '{}': {}", raw, e)))
}

/// Timestamps are written as RFC 3339 by the store clock. Rows written by
/// SQLite's `datetime('now')` (no timezone) are read as naive UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp '{}': {}", raw, e)))
}
