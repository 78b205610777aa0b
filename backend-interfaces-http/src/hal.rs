// HAL-style response envelopes

use chrono::{DateTime, Utc};
use serde::Serialize;

use backend_domain::{
    Event, EventId, EventType, Scooter, ScooterId, ScooterStatus, ScooterTelemetry, User, UserId,
    Version,
};

pub const SCOOTERS_PATH: &str = "/scooters";
pub const EVENTS_PATH: &str = "/events";
pub const USERS_PATH: &str = "/users";

#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
}

impl Links {
    pub fn to(href: String) -> Self {
        Self {
            self_link: Link { href },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventResource {
    pub id: EventId,
    pub created_at: DateTime<Utc>,
    pub scooter_id: ScooterId,
    pub user_id: UserId,
    pub event_type: EventType,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<Event> for EventResource {
    fn from(event: Event) -> Self {
        Self {
            links: Links::to(format!("{}/{}", EVENTS_PATH, event.id)),
            id: event.id,
            created_at: event.created_at,
            scooter_id: event.scooter_id,
            user_id: event.user_id,
            event_type: event.event_type,
            latitude: event.latitude,
            longitude: event.longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedEvents {
    pub events: Vec<EventResource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScooterResource {
    pub id: ScooterId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: ScooterStatus,
    pub user_id: Option<UserId>,
    pub etag: Version,
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<EmbeddedEvents>,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<Scooter> for ScooterResource {
    fn from(scooter: Scooter) -> Self {
        Self {
            links: Links::to(format!("{}/{}", SCOOTERS_PATH, scooter.id)),
            id: scooter.id,
            created_at: scooter.created_at,
            updated_at: scooter.updated_at,
            status: scooter.status,
            user_id: scooter.user_id,
            etag: scooter.version,
            embedded: None,
        }
    }
}

impl From<ScooterTelemetry> for ScooterResource {
    fn from(row: ScooterTelemetry) -> Self {
        let mut resource = ScooterResource::from(row.scooter);
        resource.embedded = Some(EmbeddedEvents {
            events: vec![EventResource::from(row.latest_event)],
        });
        resource
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResource {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<User> for UserResource {
    fn from(user: User) -> Self {
        Self {
            links: Links::to(format!("{}/{}", USERS_PATH, user.id)),
            id: user.id,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddedScooters {
    pub scooters: Vec<ScooterResource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScooterCollection {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedScooters,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl ScooterCollection {
    pub fn new(scooters: Vec<ScooterResource>) -> Self {
        Self {
            embedded: EmbeddedScooters { scooters },
            links: Links::to(SCOOTERS_PATH.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventCollection {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedEvents,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl EventCollection {
    pub fn new(events: Vec<EventResource>) -> Self {
        Self {
            embedded: EmbeddedEvents { events },
            links: Links::to(EVENTS_PATH.to_string()),
        }
    }
}
