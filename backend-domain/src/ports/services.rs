use async_trait::async_trait;
use thiserror::Error;

use crate::value_objects::UserId;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credential is missing")]
    Missing,
    #[error("credential is not a valid API key")]
    Malformed,
    #[error("no user matches the API key")]
    UnknownUser,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Resolves a raw credential into the calling user's identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credential: Option<&str>) -> Result<UserId, AuthError>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_database(&self) -> anyhow::Result<bool>;
}
