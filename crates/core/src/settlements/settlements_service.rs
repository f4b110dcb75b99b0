//! Daily settlement service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::drivers::Session;
use crate::errors::Result;
use crate::settlements::settlements_model::{NewSettlement, Settlement, SettlementUpsert};
use crate::settlements::settlements_traits::{SettlementRepositoryTrait, SettlementServiceTrait};

/// Service for recording and listing daily settlements.
///
/// The stored `company_due` is always the recomputed amount; whatever the
/// client submitted for it is discarded before the write.
pub struct SettlementService {
    repository: Arc<dyn SettlementRepositoryTrait>,
}

impl SettlementService {
    pub fn new(repository: Arc<dyn SettlementRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SettlementServiceTrait for SettlementService {
    async fn record_settlement(
        &self,
        caller: &Session,
        input: NewSettlement,
    ) -> Result<Settlement> {
        input.validate()?;
        let upsert = SettlementUpsert::resolve(caller, input);
        self.repository.upsert(upsert).await
    }

    fn list_settlements(&self, caller: &Session) -> Result<Vec<Settlement>> {
        if caller.is_admin() {
            self.repository.list_all()
        } else {
            self.repository.list_for_driver(&caller.driver_id)
        }
    }
}
