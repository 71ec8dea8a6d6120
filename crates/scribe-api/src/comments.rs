use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use scribe_types::api::{Claims, CommentRequest, CommentResponse};
use scribe_types::{ArticleId, CommentId};

use crate::error::ApiError;
use crate::{AppState, blocking, validation};

/// Any logged-in user may comment on any article.
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(article_id), _): WithRejection<Path<ArticleId>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<CommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::text("content", &req.content)?;

    let blog = state.blog.clone();
    let content = req.content.clone();
    let comment_id =
        blocking(move || blog.create_comment(article_id, claims.sub, &content)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            comment_id,
            email: claims.email,
            content: req.content,
        }),
    ))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(comment_id), _): WithRejection<Path<CommentId>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<CommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::text("content", &req.content)?;
    ensure_owns_comment(&state, &claims, comment_id).await?;

    let blog = state.blog.clone();
    let content = req.content.clone();
    blocking(move || blog.update_comment(comment_id, &content)).await?;

    Ok(Json(CommentResponse {
        comment_id,
        email: claims.email,
        content: req.content,
    }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(comment_id), _): WithRejection<Path<CommentId>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_owns_comment(&state, &claims, comment_id).await?;

    let blog = state.blog.clone();
    blocking(move || blog.delete_comment(comment_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_owns_comment(
    state: &AppState,
    claims: &Claims,
    comment_id: CommentId,
) -> Result<(), ApiError> {
    let blog = state.blog.clone();
    let user_id = claims.sub;
    if blocking(move || blog.check_owns_comment(user_id, comment_id)).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden("Comment does not belong to the logged-in user"))
    }
}
