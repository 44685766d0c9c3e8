//! `Daytrip` - AI-assisted one-day city trip planning
//!
//! This library fetches current weather, generates a template-constrained
//! itinerary through a chat-completion model, extracts the marked place
//! names, geocodes them and plans a driving route connecting them in order.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod itinerary;
pub mod models;
pub mod planner;
pub mod route;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use client::build_http_client;
pub use config::DaytripConfig;
pub use error::DaytripError;
pub use models::{Coordinate, TripPlan, TripRequest};
pub use planner::TripPlanner;
pub use route::{RouteOutcome, RoutePlanner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DaytripError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
