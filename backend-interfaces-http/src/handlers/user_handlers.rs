use axum::extract::State;
use axum::Json;

use backend_application::commands::user_commands;
use backend_application::AppState;

use crate::error::HttpError;
use crate::hal::UserResource;

/// Open endpoint: the returned id is the new user's API key.
pub async fn create_user(State(state): State<AppState>) -> Result<Json<UserResource>, HttpError> {
    let user = user_commands::create_user(&state).await?;
    Ok(Json(UserResource::from(user)))
}
