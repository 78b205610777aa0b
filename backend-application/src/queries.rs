pub mod event_queries;
pub mod spatial_queries;

pub use spatial_queries::SpatialQueryEngine;
