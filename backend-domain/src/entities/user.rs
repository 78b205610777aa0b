// User entity
// Identity only; the id doubles as the API credential

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::at_millis;
use crate::value_objects::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            created_at: at_millis(now),
        }
    }
}
