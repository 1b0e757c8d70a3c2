// Sleeper fantasy platform client.

pub mod client;
pub mod types;

pub use client::{SleeperClient, SleeperSource, DEFAULT_BASE_URL};
pub use types::{completed_weeks, to_snapshot};
