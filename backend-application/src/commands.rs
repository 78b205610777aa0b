pub mod event_commands;
pub mod occupancy_commands;
pub mod scooter_commands;
pub mod user_commands;

pub use occupancy_commands::OccupancyController;
