// Event entity
// Immutable telemetry/lifecycle record appended to the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::at_millis;
use crate::value_objects::{EventId, EventType, ScooterId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub scooter_id: ScooterId,
    pub user_id: UserId,
    pub event_type: EventType,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// An event before the ledger has assigned its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub scooter_id: ScooterId,
    pub user_id: UserId,
    pub event_type: EventType,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    /// `created_at` comes back at the precision the ledger stores.
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            scooter_id: self.scooter_id,
            user_id: self.user_id,
            event_type: self.event_type,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: at_millis(self.created_at),
        }
    }
}
