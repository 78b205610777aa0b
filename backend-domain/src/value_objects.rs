// Domain value objects
pub mod bounding_box;
pub mod event_type;
pub mod identifiers;
pub mod scooter_status;

pub use bounding_box::*;
pub use event_type::*;
pub use identifiers::*;
pub use scooter_status::*;
