//! Monthly closure reconciliation service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::warn;
use rust_decimal::Decimal;

use crate::closures::closures_model::{
    DiscrepancyFlag, MonthlyClosure, PeriodTotals, ReconcileTolerance, ReconciliationResult,
    SkippedStatement,
};
use crate::closures::closures_traits::{ClosureRepositoryTrait, ClosureServiceTrait};
use crate::drivers::{DriverServiceTrait, Session};
use crate::errors::{Error, Result};
use crate::settlements::SettlementRepositoryTrait;
use crate::statements::{StatementParserTrait, StatementRefs, StatementSource};
use crate::utils::time_utils::month_date_range;

/// Service producing monthly closure results.
///
/// Processing is a best-effort snapshot over current data and can be re-run
/// at any time; with unchanged inputs it reproduces the same totals, flags
/// and skipped entries. Statements on file that cannot be parsed are
/// reported as skipped, never as failures.
pub struct ClosureService {
    closures: Arc<dyn ClosureRepositoryTrait>,
    settlements: Arc<dyn SettlementRepositoryTrait>,
    drivers: Arc<dyn DriverServiceTrait>,
    parser: Arc<dyn StatementParserTrait>,
    tolerance: ReconcileTolerance,
}

impl ClosureService {
    pub fn new(
        closures: Arc<dyn ClosureRepositoryTrait>,
        settlements: Arc<dyn SettlementRepositoryTrait>,
        drivers: Arc<dyn DriverServiceTrait>,
        parser: Arc<dyn StatementParserTrait>,
        tolerance: ReconcileTolerance,
    ) -> Self {
        Self {
            closures,
            settlements,
            drivers,
            parser,
            tolerance,
        }
    }

    /// Compares one statement on file against its expected amount.
    fn reconcile_source(
        &self,
        refs: &StatementRefs,
        source: StatementSource,
        expected: Decimal,
        flags: &mut Vec<DiscrepancyFlag>,
        skipped: &mut Vec<SkippedStatement>,
    ) {
        let stored_name = match refs.get(source) {
            Some(name) => name,
            None => return,
        };
        match self.parser.declared_totals(stored_name, source) {
            Ok(declared) => {
                if let Some(flag) = self.tolerance.check(source, expected, declared.total) {
                    flags.push(flag);
                }
            }
            Err(err) => {
                warn!(
                    "Skipping {} statement '{}': {}",
                    source.as_str(),
                    stored_name,
                    err
                );
                skipped.push(SkippedStatement {
                    source,
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Each run's timestamp is strictly later than the previous run's, even if
/// the wall clock has not advanced.
fn next_processed_at(prior: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match prior {
        Some(previous) if now <= previous => previous + Duration::milliseconds(1),
        _ => now,
    }
}

#[async_trait]
impl ClosureServiceTrait for ClosureService {
    async fn process(
        &self,
        caller: &Session,
        driver_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlyClosure> {
        caller.require_admin()?;
        self.drivers.get_driver(driver_id)?;
        let (from, to) = month_date_range(year, month)?;

        let settlements = self.settlements.list_range(driver_id, from, to)?;
        let totals = PeriodTotals::from_settlements(&settlements);

        let existing = self.closures.find(driver_id, year, month)?;
        let refs = existing
            .as_ref()
            .map(|closure| closure.statements.clone())
            .unwrap_or_default();
        let prior_run = existing
            .and_then(|closure| closure.result)
            .map(|result| result.processed_at);

        let mut flags = Vec::new();
        let mut skipped = Vec::new();
        // Bank declares what reached the company; platforms declare takings.
        self.reconcile_source(
            &refs,
            StatementSource::Bank,
            totals.company_due,
            &mut flags,
            &mut skipped,
        );
        self.reconcile_source(
            &refs,
            StatementSource::Freenow,
            totals.takings,
            &mut flags,
            &mut skipped,
        );
        self.reconcile_source(
            &refs,
            StatementSource::Uber,
            totals.takings,
            &mut flags,
            &mut skipped,
        );

        let result = ReconciliationResult {
            totals,
            flags,
            skipped,
            processed_at: next_processed_at(prior_run),
        };
        self.closures
            .save_result(driver_id, year, month, &result)
            .await
    }

    fn get_closure(
        &self,
        caller: &Session,
        driver_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlyClosure> {
        if !caller.can_view_driver(driver_id) {
            return Err(Error::Authorization(
                "cannot view another driver's closures".to_string(),
            ));
        }
        self.closures.find(driver_id, year, month)?.ok_or_else(|| {
            Error::NotFound(format!(
                "Closure {}-{:02} for driver {}",
                year, month, driver_id
            ))
        })
    }

    fn list_closures(&self, caller: &Session, driver_id: &str) -> Result<Vec<MonthlyClosure>> {
        if !caller.can_view_driver(driver_id) {
            return Err(Error::Authorization(
                "cannot view another driver's closures".to_string(),
            ));
        }
        self.closures.list_for_driver(driver_id)
    }
}
