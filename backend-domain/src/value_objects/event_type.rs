// Telemetry event type value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Start,
    Stop,
    LocationUpdate,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event type '{0}', expected 'start', 'stop' or 'location_update'")]
pub struct UnknownEventType(pub String);

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Start => "start",
            EventType::Stop => "stop",
            EventType::LocationUpdate => "location_update",
        }
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(EventType::Start),
            "stop" => Ok(EventType::Stop),
            "location_update" => Ok(EventType::LocationUpdate),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
