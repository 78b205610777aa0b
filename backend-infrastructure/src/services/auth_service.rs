use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use backend_domain::ports::{AuthError, Authenticator, UserRepository};
use backend_domain::UserId;

/// Treats the credential as a user id: `<uuid>` or `Bearer <uuid>`.
/// The user must exist.
pub struct UserKeyAuthenticator {
    users: Arc<dyn UserRepository>,
}

impl UserKeyAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

const BEARER: &str = "bearer";

pub fn parse_api_key(raw: &str) -> Result<UserId, AuthError> {
    let trimmed = raw.trim();
    let key = match trimmed.get(..BEARER.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER) => {
            let rest = &trimmed[BEARER.len()..];
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return Err(AuthError::Malformed);
            }
            rest.trim()
        }
        _ => trimmed,
    };
    if key.is_empty() {
        return Err(AuthError::Missing);
    }
    key.parse::<UserId>().map_err(|_| AuthError::Malformed)
}

#[async_trait]
impl Authenticator for UserKeyAuthenticator {
    async fn authenticate(&self, credential: Option<&str>) -> Result<UserId, AuthError> {
        let raw = credential.ok_or(AuthError::Missing)?;
        let user_id = parse_api_key(raw)?;
        match self.users.find_by_id(&user_id).await? {
            Some(user) => Ok(user.id),
            None => {
                debug!(user_id = %user_id, "credential names no known user");
                Err(AuthError::UnknownUser)
            }
        }
    }
}
