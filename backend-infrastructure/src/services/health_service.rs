use std::sync::Arc;

use async_trait::async_trait;
use backend_domain::ports::{HealthCheckService, ScooterRepository};

pub struct DefaultHealthService {
    scooter_repo: Arc<dyn ScooterRepository>,
}

impl DefaultHealthService {
    pub fn new(scooter_repo: Arc<dyn ScooterRepository>) -> Self {
        Self { scooter_repo }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_database(&self) -> anyhow::Result<bool> {
        self.scooter_repo.ping().await.map(|_| true)
    }
}
