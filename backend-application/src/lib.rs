// Backend Application Layer

pub mod commands;
pub mod dtos;
pub mod error;
pub mod metrics;
pub mod queries;
pub mod state;

#[cfg(test)]
mod test_support;

pub use commands::OccupancyController;
pub use error::AppError;
pub use metrics::Metrics;
pub use queries::SpatialQueryEngine;
pub use state::AppState;
