use serde::Deserialize;

use backend_domain::{EventType, Scooter, ScooterId, ScooterTelemetry, UserId};

/// Raw listing parameters as they arrive on the query string. Empty values
/// count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScooterListQuery {
    pub status: Option<String>,
    pub min_latitude: Option<String>,
    pub min_longitude: Option<String>,
    pub max_latitude: Option<String>,
    pub max_longitude: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ScooterListing {
    Scooters(Vec<Scooter>),
    WithTelemetry(Vec<ScooterTelemetry>),
}

#[derive(Debug, Clone)]
pub struct PostEventCommand {
    pub scooter_id: ScooterId,
    pub user_id: UserId,
    pub event_type: EventType,
    pub latitude: f64,
    pub longitude: f64,
}
