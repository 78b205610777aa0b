use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use backend_application::dtos::PostEventCommand;
use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::{EventType, ScooterId};

use crate::error::HttpError;
use crate::hal::{EventCollection, EventResource};
use crate::middleware::authenticate;

#[derive(Debug, Deserialize)]
pub struct CreateEventBody {
    pub scooter_id: ScooterId,
    pub event_type: EventType,
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateEventBody>, JsonRejection>,
) -> Result<Json<EventResource>, HttpError> {
    let user_id = authenticate(&state, &headers).await?;
    let Json(body) = payload.map_err(|err| HttpError::Unprocessable(err.body_text()))?;
    let event = state
        .occupancy
        .post_event(PostEventCommand {
            scooter_id: body.scooter_id,
            user_id,
            event_type: body.event_type,
            latitude: body.latitude,
            longitude: body.longitude,
        })
        .await?;
    Ok(Json(EventResource::from(event)))
}

pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EventCollection>, HttpError> {
    authenticate(&state, &headers).await?;
    let events = event_queries::list_events(&state).await?;
    Ok(Json(EventCollection::new(
        events.into_iter().map(EventResource::from).collect(),
    )))
}
