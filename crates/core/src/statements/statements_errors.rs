//! Statement ingestion errors.

use thiserror::Error;

/// Errors raised while storing or parsing monthly statement files.
///
/// During reconciliation, parse failures are downgraded to skipped entries
/// in the result; they only surface as errors when a caller reads a
/// statement directly.
#[derive(Error, Debug)]
pub enum StatementError {
    #[error("No statement files were provided")]
    NoFilesProvided,

    #[error("Failed to store statement '{name}': {reason}")]
    Store { name: String, reason: String },

    #[error("Failed to parse statement '{name}': {reason}")]
    Parse { name: String, reason: String },
}
