//! Statement ingestion service.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::closures::ClosureRepositoryTrait;
use crate::drivers::{DriverServiceTrait, Session};
use crate::errors::Result;
use crate::statements::classifier::SourceClassifier;
use crate::statements::statements_errors::StatementError;
use crate::statements::statements_model::{
    FailedUpload, IngestReport, StatementRefs, StatementUpload, StoredUpload,
};
use crate::statements::statements_traits::{StatementServiceTrait, StatementStoreTrait};
use crate::utils::time_utils::month_date_range;

/// Service attaching uploaded monthly statements to a driver's closure row.
///
/// Files are stored before classification so nothing uploaded is lost; a
/// failure on one file never aborts the batch. Only the uploaded sources'
/// references are replaced on the closure row.
pub struct StatementService {
    store: Arc<dyn StatementStoreTrait>,
    closures: Arc<dyn ClosureRepositoryTrait>,
    drivers: Arc<dyn DriverServiceTrait>,
    classifier: SourceClassifier,
}

impl StatementService {
    pub fn new(
        store: Arc<dyn StatementStoreTrait>,
        closures: Arc<dyn ClosureRepositoryTrait>,
        drivers: Arc<dyn DriverServiceTrait>,
        classifier: SourceClassifier,
    ) -> Self {
        Self {
            store,
            closures,
            drivers,
            classifier,
        }
    }
}

#[async_trait]
impl StatementServiceTrait for StatementService {
    async fn ingest(
        &self,
        caller: &Session,
        driver_id: &str,
        year: i32,
        month: u32,
        uploads: Vec<StatementUpload>,
    ) -> Result<IngestReport> {
        caller.require_admin()?;
        month_date_range(year, month)?;
        self.drivers.get_driver(driver_id)?;
        if uploads.is_empty() {
            return Err(StatementError::NoFilesProvided.into());
        }

        let mut attributed = StatementRefs::default();
        let mut unattributed = Vec::new();
        let mut failed = Vec::new();

        for upload in uploads {
            let stored_name = match self.store.store(&upload.original_name, &upload.bytes) {
                Ok(name) => name,
                Err(err) => {
                    warn!(
                        "Could not store statement '{}': {}",
                        upload.original_name, err
                    );
                    failed.push(FailedUpload {
                        original_name: upload.original_name,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            match self.classifier.classify(&upload.original_name) {
                Some(source) => attributed.set(source, stored_name),
                None => {
                    warn!(
                        "Statement '{}' matches no known source, kept as '{}' without attribution",
                        upload.original_name, stored_name
                    );
                    unattributed.push(StoredUpload {
                        original_name: upload.original_name,
                        stored_name,
                    });
                }
            }
        }

        if !attributed.is_empty() {
            self.closures
                .attach_statements(driver_id, year, month, &attributed)
                .await?;
        }

        Ok(IngestReport {
            attributed,
            unattributed,
            failed,
        })
    }
}
