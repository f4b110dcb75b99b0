use crate::drivers::Session;
use crate::errors::Result;
use crate::journeys::journeys_model::{Journey, NewJourney};
use async_trait::async_trait;

/// Trait for journal repository operations
#[async_trait]
pub trait JourneyRepositoryTrait: Send + Sync {
    /// Replaces the entry for (driver, date) in full, inserting when absent.
    async fn upsert(&self, driver_id: &str, entry: NewJourney) -> Result<Journey>;
    fn list_all(&self) -> Result<Vec<Journey>>;
    fn list_for_driver(&self, driver_id: &str) -> Result<Vec<Journey>>;
}

/// Trait for journal service operations
#[async_trait]
pub trait JourneyServiceTrait: Send + Sync {
    async fn record_journey(&self, caller: &Session, entry: NewJourney) -> Result<Journey>;
    fn list_journeys(&self, caller: &Session) -> Result<Vec<Journey>>;
}
