// Latitude/longitude rectangle used by spatial queries

use serde::{Deserialize, Serialize};

/// Inclusive on all four edges. A box whose minimum exceeds its maximum on
/// either axis contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn new(min_latitude: f64, min_longitude: f64, max_latitude: f64, max_longitude: f64) -> Self {
        Self {
            min_latitude,
            min_longitude,
            max_latitude,
            max_longitude,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_latitude
            && latitude <= self.max_latitude
            && longitude >= self.min_longitude
            && longitude <= self.max_longitude
    }

    pub fn is_empty(&self) -> bool {
        self.min_latitude > self.max_latitude || self.min_longitude > self.max_longitude
    }
}
