//! Statement ingestion domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Origin of a monthly statement file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementSource {
    Bank,
    Freenow,
    Uber,
}

impl StatementSource {
    /// Reconciliation order: bank first, then the ride platforms.
    pub const ALL: [StatementSource; 3] = [
        StatementSource::Bank,
        StatementSource::Freenow,
        StatementSource::Uber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementSource::Bank => "bank",
            StatementSource::Freenow => "freenow",
            StatementSource::Uber => "uber",
        }
    }

    /// Ride platforms declare gross takings; the bank declares what was
    /// actually handed over to the company.
    pub fn is_platform(&self) -> bool {
        !matches!(self, StatementSource::Bank)
    }
}

/// One uploaded file, before classification.
#[derive(Debug, Clone)]
pub struct StatementUpload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Stored-file references for one (driver, month, year), one slot per source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRefs {
    pub bank: Option<String>,
    pub freenow: Option<String>,
    pub uber: Option<String>,
}

impl StatementRefs {
    pub fn get(&self, source: StatementSource) -> Option<&str> {
        match source {
            StatementSource::Bank => self.bank.as_deref(),
            StatementSource::Freenow => self.freenow.as_deref(),
            StatementSource::Uber => self.uber.as_deref(),
        }
    }

    pub fn set(&mut self, source: StatementSource, stored_name: String) {
        let slot = match source {
            StatementSource::Bank => &mut self.bank,
            StatementSource::Freenow => &mut self.freenow,
            StatementSource::Uber => &mut self.uber,
        };
        *slot = Some(stored_name);
    }

    pub fn is_empty(&self) -> bool {
        self.bank.is_none() && self.freenow.is_none() && self.uber.is_none()
    }
}

/// A file that was stored but matched no known source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredUpload {
    pub original_name: String,
    pub stored_name: String,
}

/// A file that could not be stored at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedUpload {
    pub original_name: String,
    pub reason: String,
}

/// Outcome of one ingestion batch. Partial success is normal: every
/// uploaded file lands in exactly one of the three buckets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub attributed: StatementRefs,
    pub unattributed: Vec<StoredUpload>,
    pub failed: Vec<FailedUpload>,
}

/// Totals a statement declares for its month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredTotals {
    pub total: Decimal,
}
