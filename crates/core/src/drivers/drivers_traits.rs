use crate::drivers::drivers_model::{Driver, DriverSummary, NewDriver, SeedDriver, Session};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for driver repository operations
#[async_trait]
pub trait DriverRepositoryTrait: Send + Sync {
    fn find_by_national_id(&self, national_id: &str) -> Result<Option<Driver>>;
    fn find_by_id(&self, driver_id: &str) -> Result<Option<Driver>>;
    fn list(&self) -> Result<Vec<Driver>>;
    /// Inserts the account unless the national ID is already taken.
    /// Returns whether a row was created.
    async fn insert_if_absent(&self, new_driver: NewDriver) -> Result<bool>;
}

/// Trait for driver service operations
#[async_trait]
pub trait DriverServiceTrait: Send + Sync {
    fn authenticate(&self, national_id: &str, password: &str) -> Result<Session>;
    fn get_driver(&self, driver_id: &str) -> Result<Driver>;
    fn list_drivers(&self, caller: &Session) -> Result<Vec<DriverSummary>>;
    async fn provision(&self, seeds: &[SeedDriver]) -> Result<usize>;
}
