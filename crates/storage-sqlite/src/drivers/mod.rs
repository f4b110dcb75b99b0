//! SQLite storage implementation for driver accounts.

mod model;
mod repository;

pub use model::{DriverDB, NewDriverDB};
pub use repository::DriverRepository;
