use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, StoreError};

pub const LATEST_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version > LATEST_VERSION {
        return Err(StoreError::Corrupt(format!(
            "schema version {version} is newer than supported version {LATEST_VERSION}"
        )));
    }

    if version < 1 {
        info!("running migration v1 (users, articles, comments)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id              TEXT PRIMARY KEY,
                email           TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                username        TEXT NOT NULL UNIQUE,
                created_at      TEXT NOT NULL,
                updated_at      TEXT
            );

            CREATE TABLE articles (
                id          TEXT PRIMARY KEY,
                owner_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title       TEXT NOT NULL,
                content     TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT
            );

            CREATE INDEX idx_articles_owner ON articles(owner_id);

            CREATE TABLE comments (
                id          TEXT PRIMARY KEY,
                article_id  TEXT NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
                author_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                content     TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT
            );

            CREATE INDEX idx_comments_article ON comments(article_id, created_at);
            CREATE INDEX idx_comments_author ON comments(author_id);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!(version = LATEST_VERSION, "Database migrations complete");
    Ok(())
}
