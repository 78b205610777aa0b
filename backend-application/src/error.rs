use backend_domain::{AuthError, OccupancyViolation};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    VersionConflict(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    OwnershipConflict(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<OccupancyViolation> for AppError {
    fn from(value: OccupancyViolation) -> Self {
        let message = value.to_string();
        match value {
            OccupancyViolation::VersionMismatch { .. } => AppError::VersionConflict(message),
            OccupancyViolation::AlreadyOccupied | OccupancyViolation::NotOccupied => {
                AppError::InvalidTransition(message)
            }
            OccupancyViolation::OccupiedByAnother => AppError::OwnershipConflict(message),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Internal(err) => AppError::Internal(err),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}
