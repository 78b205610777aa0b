// Scooter joined with its most recent ledger event.
// Computed per query, never stored.

use serde::{Deserialize, Serialize};

use crate::entities::{Event, Scooter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScooterTelemetry {
    pub scooter: Scooter,
    pub latest_event: Event,
}
