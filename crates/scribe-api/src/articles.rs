use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use scribe_core::BlogError;
use scribe_types::ArticleId;
use scribe_types::api::{ArticleDetailResponse, ArticleRequest, ArticleResponse, Claims};

use crate::error::ApiError;
use crate::{AppState, blocking, validation};

fn validate(req: &ArticleRequest) -> Result<(), ApiError> {
    validation::text("title", &req.title)?;
    validation::text("content", &req.content)
}

pub async fn create_article(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(req), _): WithRejection<Json<ArticleRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&req)?;

    let blog = state.blog.clone();
    let (title, content) = (req.title.clone(), req.content.clone());
    let article_id =
        blocking(move || blog.create_article(claims.sub, &title, &content)).await?;

    Ok((
        StatusCode::CREATED,
        Json(ArticleResponse {
            article_id,
            email: claims.email,
            title: req.title,
            content: req.content,
        }),
    ))
}

pub async fn get_article(
    State(state): State<AppState>,
    WithRejection(Path(article_id), _): WithRejection<Path<ArticleId>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let blog = state.blog.clone();
    let (article, comments) = blocking(move || {
        blog.find_article_with_comments(article_id)?
            .ok_or(BlogError::ResourceNotFound)
    })
    .await?;

    Ok(Json(ArticleDetailResponse { article, comments }))
}

pub async fn update_article(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(article_id), _): WithRejection<Path<ArticleId>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<ArticleRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&req)?;
    ensure_owns_article(&state, &claims, article_id).await?;

    let blog = state.blog.clone();
    let (title, content) = (req.title.clone(), req.content.clone());
    blocking(move || blog.update_article(article_id, &title, &content)).await?;

    Ok(Json(ArticleResponse {
        article_id,
        email: claims.email,
        title: req.title,
        content: req.content,
    }))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(article_id), _): WithRejection<Path<ArticleId>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_owns_article(&state, &claims, article_id).await?;

    let blog = state.blog.clone();
    blocking(move || blog.delete_article(article_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Missing article, someone else's article and a vanished principal all get
/// the same 403, so callers cannot probe for existence.
async fn ensure_owns_article(
    state: &AppState,
    claims: &Claims,
    article_id: ArticleId,
) -> Result<(), ApiError> {
    let blog = state.blog.clone();
    let user_id = claims.sub;
    if blocking(move || blog.check_owns_article(user_id, article_id)).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden("Article does not belong to the logged-in user"))
    }
}
