use std::sync::Arc;

use anyhow::Result;

use backend_application::commands::scooter_commands;
use backend_application::{AppState, Metrics, OccupancyController, SpatialQueryEngine};
use backend_infrastructure::{AppConfig, DefaultHealthService, SqliteRepo, UserKeyAuthenticator};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let repo = Arc::new(SqliteRepo::open(&db_config)?);
        let metrics = Arc::new(Metrics::default());

        let occupancy = Arc::new(OccupancyController::new(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            metrics.clone(),
        ));
        let spatial = Arc::new(SpatialQueryEngine::new(repo.clone(), repo.clone()));

        let state = AppState {
            config: runtime_config,
            scooter_repo: repo.clone(),
            event_repo: repo.clone(),
            user_repo: repo.clone(),
            authenticator: Arc::new(UserKeyAuthenticator::new(repo.clone())),
            health_service: Arc::new(DefaultHealthService::new(repo)),
            occupancy,
            spatial,
            metrics,
        };

        scooter_commands::seed_scooters(&state, state.config.seed_scooters).await?;

        Ok(Self { state })
    }
}

#[cfg(test)]
mod tests {
    use backend_domain::ports::ScooterRepository;
    use backend_infrastructure::IN_MEMORY_DATABASE;

    use super::*;

    #[tokio::test]
    async fn context_seeds_configured_scooters() {
        let config = AppConfig {
            database_path: IN_MEMORY_DATABASE.to_string(),
            seed_scooters: 4,
            ..AppConfig::default()
        };
        let context = AppContext::new(&config).await.expect("context");
        let scooters = context.state.scooter_repo.find_all().await.expect("list");
        assert_eq!(scooters.len(), 4);
        assert!(scooters.iter().all(|scooter| !scooter.is_occupied()));
    }
}
