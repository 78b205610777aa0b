// Scooter occupancy status value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScooterStatus {
    Free,
    Occupied,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scooter status '{0}', expected 'free' or 'occupied'")]
pub struct UnknownStatus(pub String);

impl ScooterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScooterStatus::Free => "free",
            ScooterStatus::Occupied => "occupied",
        }
    }
}

impl FromStr for ScooterStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(ScooterStatus::Free),
            "occupied" => Ok(ScooterStatus::Occupied),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for ScooterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
