//! SQLite storage implementation for daily settlements.

mod model;
mod repository;

pub use model::{SettlementChangeset, SettlementDB};
pub use repository::SettlementRepository;
