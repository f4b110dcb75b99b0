use crate::closures::closures_model::{MonthlyClosure, ReconciliationResult};
use crate::drivers::Session;
use crate::errors::Result;
use crate::statements::StatementRefs;
use async_trait::async_trait;

/// Trait for closure repository operations
#[async_trait]
pub trait ClosureRepositoryTrait: Send + Sync {
    fn find(&self, driver_id: &str, year: i32, month: u32) -> Result<Option<MonthlyClosure>>;
    /// Closure rows for one driver, newest month first.
    fn list_for_driver(&self, driver_id: &str) -> Result<Vec<MonthlyClosure>>;
    /// Merges the given references into the closure row, creating it when
    /// absent. Sources absent from `refs` keep their stored reference.
    async fn attach_statements(
        &self,
        driver_id: &str,
        year: i32,
        month: u32,
        refs: &StatementRefs,
    ) -> Result<MonthlyClosure>;
    /// Replaces the stored result in full, creating the row when absent.
    /// Statement references are left untouched.
    async fn save_result(
        &self,
        driver_id: &str,
        year: i32,
        month: u32,
        result: &ReconciliationResult,
    ) -> Result<MonthlyClosure>;
}

/// Trait for closure service operations
#[async_trait]
pub trait ClosureServiceTrait: Send + Sync {
    async fn process(
        &self,
        caller: &Session,
        driver_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlyClosure>;
    fn get_closure(
        &self,
        caller: &Session,
        driver_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlyClosure>;
    fn list_closures(&self, caller: &Session, driver_id: &str) -> Result<Vec<MonthlyClosure>>;
}
