//! Request deduplication and debouncing for Cashly's data-fetching layer

pub mod config;
mod coordinator;
mod debounce;
mod stats;


pub use config::{CoordinatorConfig, DEFAULT_DEBOUNCE_DELAY_MS};
pub use coordinator::RequestCoordinator;
pub use debounce::{Debounced, DebouncedCall};
pub use stats::CoordinatorStats;
