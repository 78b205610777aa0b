use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use backend_application::commands::scooter_commands;
use backend_application::dtos::{ScooterListQuery, ScooterListing};
use backend_application::queries::spatial_queries;
use backend_application::AppState;
use backend_domain::{Scooter, ScooterId, ScooterStatus};

use crate::error::HttpError;
use crate::hal::{ScooterCollection, ScooterResource};
use crate::middleware::{authenticate, expected_version};

#[derive(Debug, Deserialize)]
pub struct UpdateScooterBody {
    pub status: String,
}

/// Item response: HAL body plus the version as a strong `ETag`.
fn scooter_response(scooter: Scooter) -> Result<Response, HttpError> {
    let etag = HeaderValue::from_str(&format!("\"{}\"", scooter.version))
        .map_err(|err| HttpError::Internal(err.to_string()))?;
    let mut response = Json(ScooterResource::from(scooter)).into_response();
    response.headers_mut().insert(header::ETAG, etag);
    Ok(response)
}

pub async fn create_scooter(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    authenticate(&state, &headers).await?;
    let scooter = scooter_commands::create_scooter(&state).await?;
    scooter_response(scooter)
}

pub async fn list_scooters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ScooterListQuery>,
) -> Result<Json<ScooterCollection>, HttpError> {
    authenticate(&state, &headers).await?;
    let resources = match spatial_queries::list_scooters(&state, &query).await? {
        ScooterListing::Scooters(scooters) => {
            scooters.into_iter().map(ScooterResource::from).collect()
        }
        ScooterListing::WithTelemetry(rows) => {
            rows.into_iter().map(ScooterResource::from).collect()
        }
    };
    Ok(Json(ScooterCollection::new(resources)))
}

/// `PATCH /scooters/:id` with `{"status": ...}` and `If-Match: <version>`.
pub async fn update_scooter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateScooterBody>, JsonRejection>,
) -> Result<Response, HttpError> {
    let user_id = authenticate(&state, &headers).await?;
    let scooter_id = raw_id
        .parse::<ScooterId>()
        .map_err(|_| HttpError::Unprocessable(format!("{:?} is not a scooter id", raw_id)))?;
    let Json(body) = payload.map_err(|err| HttpError::Unprocessable(err.body_text()))?;
    let target = body
        .status
        .parse::<ScooterStatus>()
        .map_err(|err| HttpError::Unprocessable(err.to_string()))?;
    let expected = expected_version(&headers)?;

    debug!(scooter_id = %scooter_id, user_id = %user_id, target = %target, expected = %expected, "status update requested");
    let scooter = state
        .occupancy
        .update_status(&scooter_id, &user_id, target, &expected)
        .await?;
    scooter_response(scooter)
}
