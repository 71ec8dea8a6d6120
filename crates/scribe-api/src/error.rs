//! Mapping from core failures to HTTP responses.

use axum::{
    Json,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use scribe_core::{BlogError, ErrorKind};
use scribe_types::api::ErrorResponse;
use tracing::{debug, error};

/// One row per error kind. Ownership denials never reach this table: the
/// handlers turn a failed ownership check into 403 directly.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::PrincipalNotFound => StatusCode::UNAUTHORIZED,
        ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorKind::ResourceNotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateIdentity => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

/// Marker left on error responses so [`render_error_path`] can fill in the
/// request path.
#[derive(Clone)]
struct ErrorMessage(String);

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not logged in")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        let kind = err.kind();
        if kind == ErrorKind::Internal {
            // Do not leak storage details to clients.
            error!(error = %err, "internal failure in core operation");
            return Self::internal();
        }
        let message = match &err {
            BlogError::PrincipalNotFound => "No matching user".to_string(),
            other => other.to_string(),
        };
        Self::new(status_for(kind), message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            time: chrono::Utc::now(),
            status: self.status.to_string(),
            message: self.message.clone(),
            path: String::new(),
        };
        let mut res = (self.status, Json(body)).into_response();
        res.extensions_mut().insert(ErrorMessage(self.message));
        res
    }
}

/// Re-render error bodies with the request path and log them.
pub async fn render_error_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let res = next.run(req).await;

    let Some(ErrorMessage(message)) = res.extensions().get::<ErrorMessage>().cloned() else {
        return res;
    };

    let status = res.status();
    let body = ErrorResponse {
        time: chrono::Utc::now(),
        status: status.to_string(),
        message,
        path,
    };
    debug!(status = %body.status, path = %body.path, message = %body.message, "error response");
    (status, Json(body)).into_response()
}
