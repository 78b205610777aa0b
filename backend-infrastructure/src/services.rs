pub mod auth_service;
pub mod health_service;

pub use auth_service::*;
pub use health_service::*;
