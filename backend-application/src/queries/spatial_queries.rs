use std::sync::Arc;

use tracing::{debug, error};

use backend_domain::ports::{ScooterRepository, TelemetryRepository};
use backend_domain::{BoundingBox, Scooter, ScooterStatus, ScooterTelemetry};

use crate::dtos::{ScooterListQuery, ScooterListing};
use crate::{AppError, AppState};

/// What a scooter listing request resolved to after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScooterFilter {
    All,
    Status(ScooterStatus),
    StatusWithin(ScooterStatus, BoundingBox),
}

impl ScooterListQuery {
    /// The four box parameters come all together or not at all. A complete
    /// box without `status` is ignored and every scooter is listed.
    pub fn resolve(&self) -> Result<ScooterFilter, AppError> {
        let corners = [
            ("min_latitude", present(&self.min_latitude)),
            ("min_longitude", present(&self.min_longitude)),
            ("max_latitude", present(&self.max_latitude)),
            ("max_longitude", present(&self.max_longitude)),
        ];
        let supplied = corners.iter().filter(|(_, value)| value.is_some()).count();
        if supplied > 0 && supplied < corners.len() {
            let missing = corners
                .iter()
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::Validation(format!(
                "bounding box is incomplete, missing: {}",
                missing
            )));
        }

        let Some(raw_status) = present(&self.status) else {
            return Ok(ScooterFilter::All);
        };
        let status = raw_status
            .parse::<ScooterStatus>()
            .map_err(|err| AppError::Validation(err.to_string()))?;
        if supplied == 0 {
            return Ok(ScooterFilter::Status(status));
        }

        let mut values = [0f64; 4];
        for (slot, (name, value)) in values.iter_mut().zip(corners.iter()) {
            *slot = parse_coordinate(name, value.unwrap_or_default())?;
        }
        let [min_lat, min_lon, max_lat, max_lon] = values;
        Ok(ScooterFilter::StatusWithin(
            status,
            BoundingBox::new(min_lat, min_lon, max_lat, max_lon),
        ))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64, AppError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AppError::Validation(format!(
            "{} must be a finite number, got {:?}",
            name, raw
        ))),
    }
}

/// Read side for scooters. Results are not synchronized with concurrent
/// writers and may be stale by the time they are returned.
pub struct SpatialQueryEngine {
    scooters: Arc<dyn ScooterRepository>,
    telemetry: Arc<dyn TelemetryRepository>,
}

impl SpatialQueryEngine {
    pub fn new(
        scooters: Arc<dyn ScooterRepository>,
        telemetry: Arc<dyn TelemetryRepository>,
    ) -> Self {
        Self {
            scooters,
            telemetry,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Scooter>, AppError> {
        self.scooters.find_all().await.map_err(|err| {
            error!("failed to list scooters: {}", err);
            AppError::Internal(err)
        })
    }

    pub async fn find_by_status(&self, status: ScooterStatus) -> Result<Vec<Scooter>, AppError> {
        self.scooters.find_by_status(status).await.map_err(|err| {
            error!("failed to list {} scooters: {}", status, err);
            AppError::Internal(err)
        })
    }

    /// Scooters in `status` whose latest event falls inside `bbox`
    /// (inclusive), ordered by that event's sequence number.
    pub async fn find_by_status_within(
        &self,
        status: ScooterStatus,
        bbox: &BoundingBox,
    ) -> Result<Vec<ScooterTelemetry>, AppError> {
        if bbox.is_empty() {
            debug!(?bbox, "inverted bounding box, nothing can match");
            return Ok(Vec::new());
        }
        self.telemetry
            .latest_by_status_within(status, bbox)
            .await
            .map_err(|err| {
                error!("failed to query {} scooters within {:?}: {}", status, bbox, err);
                AppError::Internal(err)
            })
    }

    pub async fn list(&self, filter: ScooterFilter) -> Result<ScooterListing, AppError> {
        match filter {
            ScooterFilter::All => self.find_all().await.map(ScooterListing::Scooters),
            ScooterFilter::Status(status) => {
                self.find_by_status(status).await.map(ScooterListing::Scooters)
            }
            ScooterFilter::StatusWithin(status, bbox) => self
                .find_by_status_within(status, &bbox)
                .await
                .map(ScooterListing::WithTelemetry),
        }
    }
}

pub async fn list_scooters(
    state: &AppState,
    query: &ScooterListQuery,
) -> Result<ScooterListing, AppError> {
    let filter = query.resolve()?;
    state.spatial.list(filter).await
}
