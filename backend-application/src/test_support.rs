use std::sync::Arc;

use chrono::Utc;

use backend_domain::ports::{EventRepository, ScooterRepository, UserRepository};
use backend_domain::{RuntimeConfig, Scooter, User, UserId};
use backend_infrastructure::{DefaultHealthService, SqliteRepo, UserKeyAuthenticator};

use crate::{AppState, Metrics, OccupancyController, SpatialQueryEngine};

/// Controllers wired to a private in-memory database.
pub struct Fixture {
    pub scooters: Arc<dyn ScooterRepository>,
    pub events: Arc<dyn EventRepository>,
    pub users: Arc<dyn UserRepository>,
    pub occupancy: Arc<OccupancyController>,
    pub spatial: Arc<SpatialQueryEngine>,
    pub metrics: Arc<Metrics>,
}

impl Fixture {
    pub async fn new() -> Self {
        let repo = Arc::new(SqliteRepo::in_memory().expect("open sqlite"));
        let metrics = Arc::new(Metrics::default());
        let occupancy = Arc::new(OccupancyController::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            metrics.clone(),
        ));
        let spatial = Arc::new(SpatialQueryEngine::new(repo.clone(), repo.clone()));
        Self {
            scooters: repo.clone(),
            events: repo.clone(),
            users: repo,
            occupancy,
            spatial,
            metrics,
        }
    }

    pub async fn user(&self) -> UserId {
        let user = User::new(Utc::now());
        self.users.create(&user).await.expect("create user");
        user.id
    }

    pub async fn scooter(&self) -> Scooter {
        let scooter = Scooter::new_free(Utc::now());
        self.scooters.create(&scooter).await.expect("create scooter");
        scooter
    }

    pub fn state(&self) -> AppState {
        AppState {
            config: RuntimeConfig::default(),
            scooter_repo: self.scooters.clone(),
            event_repo: self.events.clone(),
            user_repo: self.users.clone(),
            authenticator: Arc::new(UserKeyAuthenticator::new(self.users.clone())),
            health_service: Arc::new(DefaultHealthService::new(self.scooters.clone())),
            occupancy: self.occupancy.clone(),
            spatial: self.spatial.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
