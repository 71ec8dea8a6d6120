use std::sync::Arc;

use scribe_db::{Database, queries};
use scribe_types::{Article, ArticleId, Comment, CommentId, User, UserId};
use tracing::{debug, info};

use crate::error::{BlogError, Result};
use crate::guard;
use crate::hasher::PasswordHasher;

/// Lifecycle manager for users, articles and comments.
///
/// Cheap to clone. Each write runs in exactly one store transaction, so a
/// cascade either completes or leaves nothing behind. Update and delete do
/// not check ownership themselves; callers consult
/// [`Blog::check_owns_article`] / [`Blog::check_owns_comment`] first.
#[derive(Clone)]
pub struct Blog {
    inner: Arc<Inner>,
}

struct Inner {
    db: Database,
    hasher: Box<dyn PasswordHasher>,
}

impl Blog {
    pub fn new(db: Database, hasher: impl PasswordHasher + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                db,
                hasher: Box::new(hasher),
            }),
        }
    }

    fn db(&self) -> &Database {
        &self.inner.db
    }

    // -- Users --

    pub fn register_user(&self, email: &str, password: &str, username: &str) -> Result<UserId> {
        let password_hash = self.inner.hasher.hash(password)?;
        let id = self
            .db()
            .with_tx(|tx| queries::insert_user(tx, email, &password_hash, username))?;
        info!(user_id = %id, username, "user registered");
        Ok(id)
    }

    /// Unknown email and wrong password are the same failure.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .db()
            .get_user_by_email(email)?
            .ok_or(BlogError::PrincipalNotFound)?;

        if !self.inner.hasher.verify(password, &user.password_hash) {
            debug!(user_id = %user.id, "password mismatch");
            return Err(BlogError::PrincipalNotFound);
        }
        Ok(user)
    }

    /// Removes the user, their articles (with every comment on them) and every
    /// comment they wrote elsewhere, all in one transaction.
    pub fn delete_user(&self, id: UserId) -> Result<()> {
        let (articles, comments) = self.db().with_tx(|tx| {
            if !queries::user_exists(tx, id)? {
                return Err(BlogError::ResourceNotFound);
            }
            let authored = queries::delete_comments_by_author(tx, id)?;
            let (articles, on_articles) = queries::delete_articles_by_owner(tx, id)?;
            queries::delete_user_row(tx, id)?;
            Ok::<_, BlogError>((articles, authored + on_articles))
        })?;
        info!(user_id = %id, articles, comments, "user deleted");
        Ok(())
    }

    pub fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.db().get_user_by_id(id)?)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.db().get_user_by_email(email)?)
    }

    // -- Articles --

    pub fn create_article(&self, owner: UserId, title: &str, content: &str) -> Result<ArticleId> {
        let id = self
            .db()
            .with_tx(|tx| queries::insert_article(tx, owner, title, content))?;
        info!(article_id = %id, owner_id = %owner, "article created");
        Ok(id)
    }

    pub fn update_article(&self, id: ArticleId, title: &str, content: &str) -> Result<()> {
        self.db()
            .with_tx(|tx| queries::update_article(tx, id, title, content))?;
        debug!(article_id = %id, "article updated");
        Ok(())
    }

    /// Deletes the article and all comments on it, regardless of author.
    pub fn delete_article(&self, id: ArticleId) -> Result<()> {
        let comments = self.db().with_tx(|tx| queries::delete_article(tx, id))?;
        info!(article_id = %id, comments, "article deleted");
        Ok(())
    }

    pub fn find_article(&self, id: ArticleId) -> Result<Option<Article>> {
        Ok(self.db().get_article(id)?)
    }

    pub fn find_article_with_comments(
        &self,
        id: ArticleId,
    ) -> Result<Option<(Article, Vec<Comment>)>> {
        Ok(self.db().get_article_with_comments(id)?)
    }

    pub fn find_articles_by_owner(&self, owner: UserId) -> Result<Vec<Article>> {
        Ok(self.db().get_articles_by_owner(owner)?)
    }

    // -- Comments --

    pub fn create_comment(
        &self,
        article: ArticleId,
        author: UserId,
        content: &str,
    ) -> Result<CommentId> {
        let id = self
            .db()
            .with_tx(|tx| queries::insert_comment(tx, article, author, content))?;
        info!(comment_id = %id, article_id = %article, author_id = %author, "comment created");
        Ok(id)
    }

    pub fn update_comment(&self, id: CommentId, content: &str) -> Result<()> {
        self.db()
            .with_tx(|tx| queries::update_comment(tx, id, content))?;
        debug!(comment_id = %id, "comment updated");
        Ok(())
    }

    pub fn delete_comment(&self, id: CommentId) -> Result<()> {
        self.db().with_tx(|tx| queries::delete_comment(tx, id))?;
        info!(comment_id = %id, "comment deleted");
        Ok(())
    }

    pub fn find_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        Ok(self.db().get_comment(id)?)
    }

    pub fn find_comments_by_article(&self, article: ArticleId) -> Result<Vec<Comment>> {
        Ok(self.db().get_comments_by_article(article)?)
    }

    pub fn find_comments_by_author(&self, author: UserId) -> Result<Vec<Comment>> {
        Ok(self.db().get_comments_by_author(author)?)
    }

    // -- Ownership --

    /// `PrincipalNotFound` if the user does not exist, `NotAuthorized` if the
    /// article is missing or belongs to someone else.
    pub fn authorize_article(&self, user: UserId, article: ArticleId) -> Result<()> {
        self.db()
            .with_conn(|conn| guard::authorize_article(conn, user, article))
    }

    pub fn authorize_comment(&self, user: UserId, comment: CommentId) -> Result<()> {
        self.db()
            .with_conn(|conn| guard::authorize_comment(conn, user, comment))
    }

    pub fn check_owns_article(&self, user: UserId, article: ArticleId) -> Result<bool> {
        guard::as_ownership(self.authorize_article(user, article), user, "article")
    }

    pub fn check_owns_comment(&self, user: UserId, comment: CommentId) -> Result<bool> {
        guard::as_ownership(self.authorize_comment(user, comment), user, "comment")
    }
}
