//! Shared types for the Scribe blog backend.
//!
//! `models` holds the three aggregates and their typed ids; `api` holds the
//! request/response shapes and token claims used by the HTTP boundary.

pub mod api;
pub mod models;

pub use models::{Article, ArticleId, Comment, CommentId, User, UserId};
