use async_trait::async_trait;

use crate::entities::{Event, NewEvent, Scooter, ScooterTelemetry, User};
use crate::value_objects::{BoundingBox, EventId, ScooterId, ScooterStatus, UserId, Version};

/// Result of a version-guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    Applied,
    /// No row matched `(id, expected version)`: the scooter changed or
    /// vanished after the caller read it.
    Stale,
}

#[async_trait]
pub trait ScooterRepository: Send + Sync {
    async fn create(&self, scooter: &Scooter) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: &ScooterId) -> anyhow::Result<Option<Scooter>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Scooter>>;
    async fn find_by_status(&self, status: ScooterStatus) -> anyhow::Result<Vec<Scooter>>;
    /// Writes `scooter` over the stored row only if the stored version still
    /// equals `expected`. Must be a single atomic conditional write.
    async fn update_with_version(
        &self,
        scooter: &Scooter,
        expected: &Version,
    ) -> anyhow::Result<CasOutcome>;
    async fn delete_by_ids(&self, ids: &[ScooterId]) -> anyhow::Result<u64>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn append(&self, event: &NewEvent) -> anyhow::Result<Event>;
    async fn find_all(&self) -> anyhow::Result<Vec<Event>>;
    async fn latest_for(&self, scooter_id: &ScooterId) -> anyhow::Result<Option<Event>>;
    async fn delete_by_ids(&self, ids: &[EventId]) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Scooters in `status` whose latest event lies inside `bbox`, ordered by
    /// that event's id ascending. Scooters without events are skipped.
    async fn latest_by_status_within(
        &self,
        status: ScooterStatus,
        bbox: &BoundingBox,
    ) -> anyhow::Result<Vec<ScooterTelemetry>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: &UserId) -> anyhow::Result<Option<User>>;
    async fn delete_by_ids(&self, ids: &[UserId]) -> anyhow::Result<u64>;
}
