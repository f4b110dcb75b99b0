//! Statements module - source classification, file storage, parsing, and
//! ingestion of monthly statement uploads.

mod classifier;
mod csv_totals;
mod file_store;
mod statements_errors;
mod statements_model;
mod statements_service;
mod statements_traits;


pub use classifier::{ClassifierRule, SourceClassifier};
pub use csv_totals::CsvStatementParser;
pub use file_store::DiskStatementStore;
pub use statements_errors::StatementError;
pub use statements_model::{
    DeclaredTotals, FailedUpload, IngestReport, StatementRefs, StatementSource, StatementUpload,
    StoredUpload,
};
pub use statements_service::StatementService;
pub use statements_traits::{StatementParserTrait, StatementServiceTrait, StatementStoreTrait};
