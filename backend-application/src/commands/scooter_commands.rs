use chrono::Utc;
use tracing::{error, info};

use backend_domain::ports::ScooterRepository;
use backend_domain::{Scooter, ScooterId};

use crate::{AppError, AppState};

/// Registers a new scooter: Free, no occupant, fresh version.
pub async fn create_scooter(state: &AppState) -> Result<Scooter, AppError> {
    let scooter = Scooter::new_free(Utc::now());
    state.scooter_repo.create(&scooter).await.map_err(|err| {
        error!("failed to create scooter: {}", err);
        AppError::Internal(err)
    })?;
    state.metrics.record_scooter_created();
    info!(scooter_id = %scooter.id, version = %scooter.version, "scooter created");
    Ok(scooter)
}

/// Adds `count` free scooters. Used at startup to give an empty fleet
/// something to dispatch.
pub async fn seed_scooters(state: &AppState, count: u32) -> Result<Vec<ScooterId>, AppError> {
    let mut ids = Vec::with_capacity(count as usize);
    for _ in 0..count {
        ids.push(create_scooter(state).await?.id);
    }
    if count > 0 {
        info!("seeded {} scooters", count);
    }
    Ok(ids)
}

pub async fn delete_scooters(state: &AppState, ids: &[ScooterId]) -> Result<u64, AppError> {
    state.scooter_repo.delete_by_ids(ids).await.map_err(AppError::Internal)
}
