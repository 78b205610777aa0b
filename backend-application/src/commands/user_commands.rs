use chrono::Utc;
use tracing::{error, info};

use backend_domain::ports::UserRepository;
use backend_domain::{User, UserId};

use crate::{AppError, AppState};

/// Creates a user. The returned id is also the caller's API key.
pub async fn create_user(state: &AppState) -> Result<User, AppError> {
    let user = User::new(Utc::now());
    state.user_repo.create(&user).await.map_err(|err| {
        error!("failed to create user: {}", err);
        AppError::Internal(err)
    })?;
    info!(user_id = %user.id, "user created");
    Ok(user)
}

pub async fn delete_users(state: &AppState, ids: &[UserId]) -> Result<u64, AppError> {
    state.user_repo.delete_by_ids(ids).await.map_err(AppError::Internal)
}

#[cfg(test)]
mod tests {
    use backend_domain::ports::Authenticator;

    use super::*;
    use crate::test_support::Fixture;

    #[tokio::test]
    async fn created_user_can_authenticate_until_deleted() {
        let fx = Fixture::new().await;
        let state = fx.state();
        let user = create_user(&state).await.expect("create");
        let key = user.id.to_string();
        assert_eq!(
            state.authenticator.authenticate(Some(&key)).await.expect("auth"),
            user.id
        );

        assert_eq!(delete_users(&state, &[user.id]).await.expect("delete"), 1);
        assert!(state.authenticator.authenticate(Some(&key)).await.is_err());
    }
}
