pub mod seed_coordinator;
pub mod seed_source;
