//! Drivers module - domain models, services, and traits.

mod drivers_model;
mod drivers_service;
mod drivers_traits;


pub use drivers_model::{Driver, DriverSummary, NewDriver, Role, SeedDriver, Session};
pub use drivers_service::{hash_password, DriverService};
pub use drivers_traits::{DriverRepositoryTrait, DriverServiceTrait};
