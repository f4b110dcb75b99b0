//! SQLite storage implementation for monthly closures.

mod model;
mod repository;

pub use model::MonthlyClosureDB;
pub use repository::ClosureRepository;
