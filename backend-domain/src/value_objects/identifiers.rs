// Identifier value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScooterId(pub Uuid);

impl ScooterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScooterId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// Ledger sequence number. Assigned by the store on append, strictly
/// increasing across all scooters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

/// Optimistic-concurrency token for a scooter row. A fresh random value is
/// minted on every successful mutation, so a token observed once never
/// matches a later state of the same scooter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub Uuid);

impl Version {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accepts a bare uuid or an HTTP entity tag (`"uuid"` / `W/"uuid"`).
    pub fn parse_etag(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix("W/").unwrap_or(trimmed);
        let trimmed = trimmed.trim_matches('"');
        Uuid::parse_str(trimmed).ok().map(Self)
    }
}

macro_rules! uuid_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl FromStr for $ty {
                type Err = uuid::Error;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Uuid::parse_str(s.trim()).map(Self)
                }
            }
        )*
    };
}

uuid_display!(ScooterId, UserId, Version);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_bare_and_quoted_etags() {
        let version = Version::fresh();
        let bare = version.to_string();
        assert_eq!(Version::parse_etag(&bare), Some(version));
        assert_eq!(Version::parse_etag(&format!("\"{bare}\"")), Some(version));
        assert_eq!(Version::parse_etag(&format!("W/\"{bare}\"")), Some(version));
        assert_eq!(Version::parse_etag("not-a-version"), None);
    }

    #[test]
    fn fresh_versions_do_not_repeat() {
        let first = Version::fresh();
        let second = Version::fresh();
        assert_ne!(first, second);
    }
}
