//! Monthly closure domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::settlements::Settlement;
use crate::statements::{StatementRefs, StatementSource};

/// Lifecycle of a closure row. Uploads alone leave it unprocessed; only
/// the explicit process action produces a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosureStatus {
    Unprocessed,
    Processed,
}

/// Domain model representing one (driver, month, year) closure row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyClosure {
    pub id: String,
    pub driver_id: String,
    pub year: i32,
    pub month: u32,
    pub statements: StatementRefs,
    pub result: Option<ReconciliationResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyClosure {
    pub fn status(&self) -> ClosureStatus {
        if self.result.is_some() {
            ClosureStatus::Processed
        } else {
            ClosureStatus::Unprocessed
        }
    }
}

/// Aggregated settlement figures for one driver month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub company_due: Decimal,
    pub rides: i64,
    pub kilometers: Decimal,
    pub takings: Decimal,
    pub days_recorded: u32,
}

impl PeriodTotals {
    /// Folds a month of settlements. Signed amounts sum as recorded.
    pub fn from_settlements(settlements: &[Settlement]) -> Self {
        let mut totals = PeriodTotals {
            company_due: Decimal::ZERO,
            rides: 0,
            kilometers: Decimal::ZERO,
            takings: Decimal::ZERO,
            days_recorded: settlements.len() as u32,
        };
        for settlement in settlements {
            totals.company_due += settlement.company_due;
            totals.rides += i64::from(settlement.rides);
            totals.kilometers += settlement.kilometers;
            totals.takings += settlement.takings;
        }
        totals
    }
}

/// A comparison that fell outside tolerance. `delta` is the absolute
/// difference between the two amounts. Flags are findings for review, not
/// errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyFlag {
    pub source: StatementSource,
    pub expected: Decimal,
    pub observed: Decimal,
    pub delta: Decimal,
}

/// A statement on file that could not be parsed during processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedStatement {
    pub source: StatementSource,
    pub reason: String,
}

/// Outcome of one processing run, stored in full on the closure row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub totals: PeriodTotals,
    pub flags: Vec<DiscrepancyFlag>,
    pub skipped: Vec<SkippedStatement>,
    pub processed_at: DateTime<Utc>,
}

/// Tolerance for reconciliation comparisons. A delta is flagged only when
/// it exceeds both the relative ratio of the expected amount and the
/// absolute floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileTolerance {
    pub ratio: Decimal,
    pub min_delta: Decimal,
}

impl Default for ReconcileTolerance {
    fn default() -> Self {
        Self {
            ratio: dec!(0.01),
            min_delta: dec!(1),
        }
    }
}

impl ReconcileTolerance {
    /// Compares an expected amount with a declared one, producing a flag
    /// when the difference exceeds tolerance.
    pub fn check(
        &self,
        source: StatementSource,
        expected: Decimal,
        observed: Decimal,
    ) -> Option<DiscrepancyFlag> {
        let delta = (expected - observed).abs();
        let allowed = (expected.abs() * self.ratio).max(self.min_delta);
        if delta > allowed {
            Some(DiscrepancyFlag {
                source,
                expected,
                observed,
                delta,
            })
        } else {
            None
        }
    }
}
