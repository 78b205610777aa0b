use std::sync::Arc;

use backend_domain::ports::{
    Authenticator, EventRepository, HealthCheckService, ScooterRepository, UserRepository,
};
use backend_domain::RuntimeConfig;

use crate::{Metrics, OccupancyController, SpatialQueryEngine};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub scooter_repo: Arc<dyn ScooterRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub authenticator: Arc<dyn Authenticator>,
    pub health_service: Arc<dyn HealthCheckService>,
    pub occupancy: Arc<OccupancyController>,
    pub spatial: Arc<SpatialQueryEngine>,
    pub metrics: Arc<Metrics>,
}
