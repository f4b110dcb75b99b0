use chrono::NaiveDate;

use crate::drivers::Session;
use crate::errors::Result;
use crate::settlements::settlements_model::{NewSettlement, Settlement, SettlementUpsert};
use async_trait::async_trait;

/// Trait for settlement repository operations
#[async_trait]
pub trait SettlementRepositoryTrait: Send + Sync {
    /// Replaces the settlement for (driver, date) in full, inserting when
    /// absent.
    async fn upsert(&self, settlement: SettlementUpsert) -> Result<Settlement>;
    fn list_all(&self) -> Result<Vec<Settlement>>;
    fn list_for_driver(&self, driver_id: &str) -> Result<Vec<Settlement>>;
    /// Settlements for one driver with dates in `[from, to]`, ascending.
    fn list_range(&self, driver_id: &str, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<Settlement>>;
}

/// Trait for settlement service operations
#[async_trait]
pub trait SettlementServiceTrait: Send + Sync {
    async fn record_settlement(&self, caller: &Session, input: NewSettlement)
        -> Result<Settlement>;
    fn list_settlements(&self, caller: &Session) -> Result<Vec<Settlement>>;
}
