use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use backend_domain::ports::{CasOutcome, EventRepository, ScooterRepository, UserRepository};
use backend_domain::{
    ensure_can_acquire, ensure_can_post_event, ensure_can_release, Event, NewEvent,
    OccupancyViolation, Scooter, ScooterId, ScooterStatus, UserId, Version,
};

use crate::dtos::PostEventCommand;
use crate::{AppError, Metrics};

/// Owns every write to a scooter's occupancy and to the event ledger.
///
/// Nothing here takes a lock. Each transition reads the scooter, checks the
/// rules against that snapshot, then issues one conditional write keyed on
/// `(id, expected version)`. When two requests race on the same version the
/// store lets exactly one write through; the loser sees `CasOutcome::Stale`
/// and gets `VersionConflict`. Retrying is up to the caller.
pub struct OccupancyController {
    scooters: Arc<dyn ScooterRepository>,
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserRepository>,
    metrics: Arc<Metrics>,
}

impl OccupancyController {
    pub fn new(
        scooters: Arc<dyn ScooterRepository>,
        events: Arc<dyn EventRepository>,
        users: Arc<dyn UserRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            scooters,
            events,
            users,
            metrics,
        }
    }

    pub async fn acquire(
        &self,
        scooter_id: &ScooterId,
        user_id: &UserId,
        expected: &Version,
    ) -> Result<Scooter, AppError> {
        let scooter = self.load(scooter_id).await?;
        ensure_can_acquire(&scooter, expected).map_err(|err| self.reject(scooter_id, err))?;

        let next = scooter.occupied_by(*user_id, Utc::now());
        let saved = self.commit(next, expected).await?;
        self.metrics.record_acquisition();
        info!(scooter_id = %scooter_id, user_id = %user_id, version = %saved.version, "scooter occupied");
        Ok(saved)
    }

    /// The releasing user is only logged. Whether a non-occupant may free a
    /// scooter is an open product question; today anyone authenticated can.
    pub async fn release(
        &self,
        scooter_id: &ScooterId,
        releasing_user_id: &UserId,
        expected: &Version,
    ) -> Result<Scooter, AppError> {
        let scooter = self.load(scooter_id).await?;
        ensure_can_release(&scooter, expected).map_err(|err| self.reject(scooter_id, err))?;

        if scooter.user_id.as_ref() != Some(releasing_user_id) {
            debug!(
                scooter_id = %scooter_id,
                releasing_user_id = %releasing_user_id,
                "scooter released by a user other than its occupant"
            );
        }

        let next = scooter.released(Utc::now());
        let saved = self.commit(next, expected).await?;
        self.metrics.record_release();
        info!(scooter_id = %scooter_id, user_id = %releasing_user_id, version = %saved.version, "scooter freed");
        Ok(saved)
    }

    pub async fn update_status(
        &self,
        scooter_id: &ScooterId,
        user_id: &UserId,
        target: ScooterStatus,
        expected: &Version,
    ) -> Result<Scooter, AppError> {
        match target {
            ScooterStatus::Occupied => self.acquire(scooter_id, user_id, expected).await,
            ScooterStatus::Free => self.release(scooter_id, user_id, expected).await,
        }
    }

    /// Appends telemetry for a scooter the caller currently occupies.
    /// Event types are not sequenced: a second `start`, or a `stop` with no
    /// `start` before it, is accepted like any other event.
    pub async fn post_event(&self, command: PostEventCommand) -> Result<Event, AppError> {
        let scooter = self.load(&command.scooter_id).await?;
        ensure_can_post_event(&scooter, &command.user_id)
            .map_err(|err| self.reject(&command.scooter_id, err))?;

        let user = self.users.find_by_id(&command.user_id).await.map_err(|err| {
            error!("failed to look up user {}: {}", command.user_id, err);
            AppError::Internal(err)
        })?;
        if user.is_none() {
            return Err(AppError::NotFound(format!("user {} not found", command.user_id)));
        }

        let new_event = NewEvent {
            scooter_id: command.scooter_id,
            user_id: command.user_id,
            event_type: command.event_type,
            latitude: command.latitude,
            longitude: command.longitude,
            created_at: Utc::now(),
        };
        let event = self.events.append(&new_event).await.map_err(|err| {
            error!("failed to append event for scooter {}: {}", command.scooter_id, err);
            AppError::Internal(err)
        })?;
        self.metrics.record_event_appended();
        debug!(
            event_id = %event.id,
            scooter_id = %event.scooter_id,
            event_type = %event.event_type,
            "event appended"
        );
        Ok(event)
    }

    async fn load(&self, scooter_id: &ScooterId) -> Result<Scooter, AppError> {
        self.scooters
            .find_by_id(scooter_id)
            .await
            .map_err(|err| {
                error!("failed to load scooter {}: {}", scooter_id, err);
                AppError::Internal(err)
            })?
            .ok_or_else(|| AppError::NotFound(format!("scooter {} not found", scooter_id)))
    }

    async fn commit(&self, next: Scooter, expected: &Version) -> Result<Scooter, AppError> {
        let outcome = self
            .scooters
            .update_with_version(&next, expected)
            .await
            .map_err(|err| {
                error!("failed to update scooter {}: {}", next.id, err);
                AppError::Internal(err)
            })?;
        match outcome {
            CasOutcome::Applied => Ok(next),
            CasOutcome::Stale => {
                self.metrics.record_version_conflict();
                warn!(scooter_id = %next.id, expected = %expected, "conditional update lost the race");
                Err(AppError::VersionConflict(format!(
                    "scooter {} was modified concurrently, version {} is stale",
                    next.id, expected
                )))
            }
        }
    }

    fn reject(&self, scooter_id: &ScooterId, violation: OccupancyViolation) -> AppError {
        match &violation {
            OccupancyViolation::VersionMismatch { .. } => self.metrics.record_version_conflict(),
            OccupancyViolation::AlreadyOccupied | OccupancyViolation::NotOccupied => {
                self.metrics.record_invalid_transition()
            }
            OccupancyViolation::OccupiedByAnother => self.metrics.record_ownership_conflict(),
        }
        warn!(scooter_id = %scooter_id, "rejected: {}", violation);
        AppError::from(violation)
    }
}
