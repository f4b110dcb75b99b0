//! Fleetdesk Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for the fleet back office.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod closures;
pub mod constants;
pub mod drivers;
pub mod errors;
pub mod journeys;
pub mod settlements;
pub mod statements;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
