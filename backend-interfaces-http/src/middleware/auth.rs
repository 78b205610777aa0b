use axum::http::{header, HeaderMap};

use backend_application::{AppError, AppState};
use backend_domain::ports::Authenticator;
use backend_domain::UserId;

use crate::error::HttpError;

/// Raw `Authorization` header value, if present and valid UTF-8.
pub fn credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Resolves the caller. Every scooter and event route goes through here;
/// user creation and the health probes do not.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserId, HttpError> {
    state
        .authenticator
        .authenticate(credential(headers))
        .await
        .map_err(|err| HttpError::from(AppError::from(err)))
}
