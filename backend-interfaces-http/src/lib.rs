pub mod error;
pub mod hal;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use error::*;
pub use handlers::*;
pub use middleware::*;
pub use routes::*;
