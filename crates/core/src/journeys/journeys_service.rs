//! Work-journal service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::drivers::Session;
use crate::errors::Result;
use crate::journeys::journeys_model::{Journey, NewJourney};
use crate::journeys::journeys_traits::{JourneyRepositoryTrait, JourneyServiceTrait};

/// Service for recording and listing work-journal days.
///
/// A caller always writes their own journal; listings are scoped by role
/// (administrators see every driver, drivers only themselves).
pub struct JourneyService {
    repository: Arc<dyn JourneyRepositoryTrait>,
}

impl JourneyService {
    pub fn new(repository: Arc<dyn JourneyRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl JourneyServiceTrait for JourneyService {
    async fn record_journey(&self, caller: &Session, entry: NewJourney) -> Result<Journey> {
        entry.validate()?;
        self.repository.upsert(&caller.driver_id, entry).await
    }

    fn list_journeys(&self, caller: &Session) -> Result<Vec<Journey>> {
        if caller.is_admin() {
            self.repository.list_all()
        } else {
            self.repository.list_for_driver(&caller.driver_id)
        }
    }
}
