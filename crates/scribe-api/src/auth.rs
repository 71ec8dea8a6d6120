use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::error;

use scribe_types::UserId;
use scribe_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::{AppState, blocking, validation};

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::email(&req.email)?;
    validation::text("username", &req.username)?;
    validation::password(&req.password)?;

    let blog = state.blog.clone();
    let (email, username) = (req.email.clone(), req.username.clone());
    let user_id =
        blocking(move || blog.register_user(&email, &req.password, &username)).await?;

    let token = create_token(&state.jwt_secret, user_id, &req.email, &req.username)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id,
            email: req.email,
            username: req.username,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let blog = state.blog.clone();
    let user = blocking(move || blog.authenticate(&req.email, &req.password)).await?;

    let token = create_token(&state.jwt_secret, user.id, &user.email, &user.username)?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        email: user.email,
        username: user.username,
        token,
    }))
}

/// A user may only delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.sub != user_id {
        return Err(ApiError::forbidden("Cannot delete another user's account"));
    }

    let blog = state.blog.clone();
    blocking(move || blog.delete_user(user_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn create_token(
    secret: &str,
    user_id: UserId,
    email: &str,
    username: &str,
) -> Result<String, ApiError> {
    sign_claims(secret, user_id, email, username).map_err(|e| {
        error!("token signing failed: {}", e);
        ApiError::internal()
    })
}

fn sign_claims(
    secret: &str,
    user_id: UserId,
    email: &str,
    username: &str,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
