use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Article, ArticleId, Comment, CommentId, UserId};

// -- Token claims --

/// Bearer token claims. The boundary resolves the principal from these and
/// passes `sub` explicitly into every core operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub email: String,
    pub username: String,
    pub exp: usize,
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub token: String,
}

// -- Articles --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticleRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub article_id: ArticleId,
    pub email: String,
    pub title: String,
    pub content: String,
}

/// An article together with the comments attached to it, oldest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleDetailResponse {
    pub article: Article,
    pub comments: Vec<Comment>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment_id: CommentId,
    pub email: String,
    pub content: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub time: DateTime<Utc>,
    pub status: String,
    pub message: String,
    pub path: String,
}
