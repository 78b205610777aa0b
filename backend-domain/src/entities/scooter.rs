// Scooter entity
// Current occupancy state plus the version token guarding it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::at_millis;
use crate::value_objects::{ScooterId, ScooterStatus, UserId, Version};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scooter {
    pub id: ScooterId,
    pub status: ScooterStatus,
    /// Set only while `status` is `Occupied`.
    pub user_id: Option<UserId>,
    pub version: Version,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scooter {
    pub fn new_free(now: DateTime<Utc>) -> Self {
        let now = at_millis(now);
        Self {
            id: ScooterId::new(),
            status: ScooterStatus::Free,
            user_id: None,
            version: Version::fresh(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.status == ScooterStatus::Occupied
    }

    /// Next state after `user_id` takes the scooter. Does not check whether
    /// the transition is allowed; see `services::occupancy_rules`.
    pub fn occupied_by(&self, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            status: ScooterStatus::Occupied,
            user_id: Some(user_id),
            version: Version::fresh(),
            created_at: self.created_at,
            updated_at: at_millis(now),
        }
    }

    pub fn released(&self, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            status: ScooterStatus::Free,
            user_id: None,
            version: Version::fresh(),
            created_at: self.created_at,
            updated_at: at_millis(now),
        }
    }
}
