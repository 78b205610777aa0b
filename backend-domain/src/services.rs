// Pure domain rules, no I/O
pub mod occupancy_rules;

pub use occupancy_rules::*;
