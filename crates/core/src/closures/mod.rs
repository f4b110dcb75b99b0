//! Closures module - monthly aggregation and statement reconciliation.

mod closures_model;
mod closures_service;
mod closures_traits;


pub use closures_model::{
    ClosureStatus, DiscrepancyFlag, MonthlyClosure, PeriodTotals, ReconcileTolerance,
    ReconciliationResult, SkippedStatement,
};
pub use closures_service::ClosureService;
pub use closures_traits::{ClosureRepositoryTrait, ClosureServiceTrait};
