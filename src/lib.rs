pub mod api;
pub mod config;
pub mod credential;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;

pub use error::QuoteError;
pub use service::seed_coordinator::{SeedCoordinator, SeedOutcome};
pub use types::seed::SeedCandidate;
