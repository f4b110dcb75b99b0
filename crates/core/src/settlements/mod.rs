//! Settlements module - domain models, services, and traits.

mod settlements_model;
mod settlements_service;
mod settlements_traits;



pub use settlements_model::{NewSettlement, Settlement, SettlementUpsert};
pub use settlements_service::SettlementService;
pub use settlements_traits::{SettlementRepositoryTrait, SettlementServiceTrait};
