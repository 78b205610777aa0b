// Domain entities
pub mod clock;
pub mod event;
pub mod runtime_config;
pub mod scooter;
pub mod telemetry;
pub mod user;

pub use clock::*;
pub use event::*;
pub use runtime_config::*;
pub use scooter::*;
pub use telemetry::*;
pub use user::*;
