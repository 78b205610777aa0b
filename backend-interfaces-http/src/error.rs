use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use backend_application::AppError;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    PreconditionFailed(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized(msg) => HttpError::Unauthorized(msg),
            AppError::NotFound(msg) => HttpError::NotFound(msg),
            AppError::VersionConflict(msg) => HttpError::PreconditionFailed(msg),
            AppError::InvalidTransition(msg) => HttpError::BadRequest(msg),
            AppError::OwnershipConflict(msg) => HttpError::Conflict(msg),
            AppError::Validation(msg) => HttpError::Unprocessable(msg),
            AppError::Internal(err) => HttpError::Internal(format!("{:#}", err)),
        }
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            HttpError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Problem-details style body.
#[derive(Debug, Serialize)]
pub struct ProblemBody {
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            HttpError::Internal(msg) => {
                error!("request failed: {}", msg);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ProblemBody {
            title: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            status: status.as_u16(),
            detail,
        };
        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
