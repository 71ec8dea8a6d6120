//! Store primitives. Each function works on a plain `&Connection` so callers
//! can compose several of them inside one [`Database::with_tx`] transaction.
//! Functions that issue more than one statement must run inside a transaction.

use rusqlite::{Connection, OptionalExtension, params};
use scribe_types::{Article, ArticleId, Comment, CommentId, User, UserId};
use tracing::debug;

use crate::Database;
use crate::error::{Result, StoreError, map_identity_conflict};
use crate::models::{ArticleRow, CommentRow, UserRow};

/// Store clock, evaluated by SQLite at statement time.
const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

// -- Users --

pub fn insert_user(
    conn: &Connection,
    email: &str,
    password_hash: &str,
    username: &str,
) -> Result<UserId> {
    let id = UserId::new_v4();
    conn.execute(
        &format!(
            "INSERT INTO users (id, email, password_hash, username, created_at)
             VALUES (?1, ?2, ?3, ?4, {NOW})"
        ),
        params![id.to_string(), email, password_hash, username],
    )
    .map_err(map_identity_conflict)?;
    Ok(id)
}

pub fn query_user_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = ?1", UserRow::COLUMNS);
    conn.query_row(&sql, [id.to_string()], UserRow::from_row)
        .optional()?
        .map(User::try_from)
        .transpose()
}

pub fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE email = ?1", UserRow::COLUMNS);
    conn.query_row(&sql, [email], UserRow::from_row)
        .optional()?
        .map(User::try_from)
        .transpose()
}

pub fn user_exists(conn: &Connection, id: UserId) -> Result<bool> {
    exists(conn, "SELECT 1 FROM users WHERE id = ?1", params![id.to_string()])
}

/// Deletes only the user row; dependent rows are the caller's job.
pub fn delete_user_row(conn: &Connection, id: UserId) -> Result<()> {
    let n = conn.execute("DELETE FROM users WHERE id = ?1", [id.to_string()])?;
    if n == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

// -- Articles --

pub fn insert_article(
    conn: &Connection,
    owner: UserId,
    title: &str,
    content: &str,
) -> Result<ArticleId> {
    if !user_exists(conn, owner)? {
        return Err(StoreError::OwnerNotFound);
    }

    let id = ArticleId::new_v4();
    conn.execute(
        &format!(
            "INSERT INTO articles (id, owner_id, title, content, created_at)
             VALUES (?1, ?2, ?3, ?4, {NOW})"
        ),
        params![id.to_string(), owner.to_string(), title, content],
    )?;
    Ok(id)
}

pub fn query_article(conn: &Connection, id: ArticleId) -> Result<Option<Article>> {
    let sql = format!("SELECT {} FROM articles WHERE id = ?1", ArticleRow::COLUMNS);
    conn.query_row(&sql, [id.to_string()], ArticleRow::from_row)
        .optional()?
        .map(Article::try_from)
        .transpose()
}

pub fn query_articles_by_owner(conn: &Connection, owner: UserId) -> Result<Vec<Article>> {
    let sql = format!(
        "SELECT {} FROM articles WHERE owner_id = ?1 ORDER BY created_at, rowid",
        ArticleRow::COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([owner.to_string()], ArticleRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(Article::try_from).collect()
}

pub fn article_owned_by(conn: &Connection, article: ArticleId, owner: UserId) -> Result<bool> {
    exists(
        conn,
        "SELECT 1 FROM articles WHERE id = ?1 AND owner_id = ?2",
        params![article.to_string(), owner.to_string()],
    )
}

pub fn update_article(conn: &Connection, id: ArticleId, title: &str, content: &str) -> Result<()> {
    let n = conn.execute(
        &format!("UPDATE articles SET title = ?1, content = ?2, updated_at = {NOW} WHERE id = ?3"),
        params![title, content, id.to_string()],
    )?;
    if n == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Deletes an article and every comment attached to it, whoever wrote them.
pub fn delete_article(conn: &Connection, id: ArticleId) -> Result<usize> {
    let comments = conn.execute("DELETE FROM comments WHERE article_id = ?1", [id.to_string()])?;
    let n = conn.execute("DELETE FROM articles WHERE id = ?1", [id.to_string()])?;
    if n == 0 {
        return Err(StoreError::NotFound);
    }
    debug!(article_id = %id, comments, "article deleted");
    Ok(comments)
}

/// Deletes every article owned by `owner` along with their comments.
/// Returns (articles, comments) removed.
pub fn delete_articles_by_owner(conn: &Connection, owner: UserId) -> Result<(usize, usize)> {
    let comments = conn.execute(
        "DELETE FROM comments
         WHERE article_id IN (SELECT id FROM articles WHERE owner_id = ?1)",
        [owner.to_string()],
    )?;
    let articles = conn.execute("DELETE FROM articles WHERE owner_id = ?1", [owner.to_string()])?;
    Ok((articles, comments))
}

// -- Comments --

pub fn insert_comment(
    conn: &Connection,
    article: ArticleId,
    author: UserId,
    content: &str,
) -> Result<CommentId> {
    if query_article(conn, article)?.is_none() {
        return Err(StoreError::ArticleNotFound);
    }
    if !user_exists(conn, author)? {
        return Err(StoreError::AuthorNotFound);
    }

    let id = CommentId::new_v4();
    conn.execute(
        &format!(
            "INSERT INTO comments (id, article_id, author_id, content, created_at)
             VALUES (?1, ?2, ?3, ?4, {NOW})"
        ),
        params![id.to_string(), article.to_string(), author.to_string(), content],
    )?;
    Ok(id)
}

pub fn query_comment(conn: &Connection, id: CommentId) -> Result<Option<Comment>> {
    let sql = format!("SELECT {} FROM comments WHERE id = ?1", CommentRow::COLUMNS);
    conn.query_row(&sql, [id.to_string()], CommentRow::from_row)
        .optional()?
        .map(Comment::try_from)
        .transpose()
}

pub fn query_comments_by_article(conn: &Connection, article: ArticleId) -> Result<Vec<Comment>> {
    query_comments_where(conn, "article_id", &article.to_string())
}

pub fn query_comments_by_author(conn: &Connection, author: UserId) -> Result<Vec<Comment>> {
    query_comments_where(conn, "author_id", &author.to_string())
}

fn query_comments_where(conn: &Connection, column: &str, value: &str) -> Result<Vec<Comment>> {
    let sql = format!(
        "SELECT {} FROM comments WHERE {} = ?1 ORDER BY created_at, rowid",
        CommentRow::COLUMNS,
        column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([value], CommentRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(Comment::try_from).collect()
}

pub fn comment_authored_by(conn: &Connection, comment: CommentId, author: UserId) -> Result<bool> {
    exists(
        conn,
        "SELECT 1 FROM comments WHERE id = ?1 AND author_id = ?2",
        params![comment.to_string(), author.to_string()],
    )
}

pub fn update_comment(conn: &Connection, id: CommentId, content: &str) -> Result<()> {
    let n = conn.execute(
        &format!("UPDATE comments SET content = ?1, updated_at = {NOW} WHERE id = ?2"),
        params![content, id.to_string()],
    )?;
    if n == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete_comment(conn: &Connection, id: CommentId) -> Result<()> {
    let n = conn.execute("DELETE FROM comments WHERE id = ?1", [id.to_string()])?;
    if n == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete_comments_by_author(conn: &Connection, author: UserId) -> Result<usize> {
    Ok(conn.execute("DELETE FROM comments WHERE author_id = ?1", [author.to_string()])?)
}

fn exists(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<bool> {
    let found = conn
        .query_row(sql, params, |_| Ok(()))
        .optional()?
        .is_some();
    Ok(found)
}

// -- Read helpers on the shared handle --

impl Database {
    pub fn get_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_article(&self, id: ArticleId) -> Result<Option<Article>> {
        self.with_conn(|conn| query_article(conn, id))
    }

    /// Article and its comments read under one lock, so a concurrent
    /// cascade is seen either whole or not at all.
    pub fn get_article_with_comments(
        &self,
        id: ArticleId,
    ) -> Result<Option<(Article, Vec<Comment>)>> {
        self.with_conn(|conn| {
            let Some(article) = query_article(conn, id)? else {
                return Ok(None);
            };
            let comments = query_comments_by_article(conn, id)?;
            Ok(Some((article, comments)))
        })
    }

    pub fn get_articles_by_owner(&self, owner: UserId) -> Result<Vec<Article>> {
        self.with_conn(|conn| query_articles_by_owner(conn, owner))
    }

    pub fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        self.with_conn(|conn| query_comment(conn, id))
    }

    pub fn get_comments_by_article(&self, article: ArticleId) -> Result<Vec<Comment>> {
        self.with_conn(|conn| query_comments_by_article(conn, article))
    }

    pub fn get_comments_by_author(&self, author: UserId) -> Result<Vec<Comment>> {
        self.with_conn(|conn| query_comments_by_author(conn, author))
    }
}
