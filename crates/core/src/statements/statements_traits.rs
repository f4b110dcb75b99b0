use crate::drivers::Session;
use crate::errors::Result;
use crate::statements::statements_model::{
    DeclaredTotals, IngestReport, StatementSource, StatementUpload,
};
use async_trait::async_trait;

/// Persistence for uploaded statement bytes.
pub trait StatementStoreTrait: Send + Sync {
    /// Writes the bytes and returns the generated stored name.
    fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String>;
    fn read(&self, stored_name: &str) -> Result<Vec<u8>>;
}

/// Extracts the totals a statement declares for its month.
pub trait StatementParserTrait: Send + Sync {
    fn declared_totals(
        &self,
        stored_name: &str,
        source: StatementSource,
    ) -> Result<DeclaredTotals>;
}

/// Trait for statement ingestion operations
#[async_trait]
pub trait StatementServiceTrait: Send + Sync {
    async fn ingest(
        &self,
        caller: &Session,
        driver_id: &str,
        year: i32,
        month: u32,
        uploads: Vec<StatementUpload>,
    ) -> Result<IngestReport>;
}
