//! HTTP boundary for the blog: principal resolution, request validation,
//! ownership pre-checks, and error-to-status mapping around [`scribe_core::Blog`].

pub mod articles;
pub mod auth;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod validation;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post, put},
};
use scribe_core::Blog;
use tracing::error;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub blog: Blog,
    pub jwt_secret: String,
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/users", post(auth::register))
        .route("/users/login", post(auth::login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/users/{user_id}", axum::routing::delete(auth::delete_user))
        .route("/posts", post(articles::create_article))
        .route(
            "/posts/{article_id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/posts/{article_id}/comments", post(comments::create_comment))
        .route(
            "/comments/{comment_id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(no_route)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(axum::middleware::from_fn(error::render_error_path))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn no_route() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "No such route")
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Run a core call off the async runtime; SQLite access blocks.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> scribe_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}
