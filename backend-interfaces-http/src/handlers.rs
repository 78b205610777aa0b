pub mod event_handlers;
pub mod ops_handlers;
pub mod scooter_handlers;
pub mod user_handlers;

pub use event_handlers::*;
pub use ops_handlers::*;
pub use scooter_handlers::*;
pub use user_handlers::*;
