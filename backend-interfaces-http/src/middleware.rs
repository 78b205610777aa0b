pub mod auth;
pub mod preconditions;

pub use auth::*;
pub use preconditions::*;
