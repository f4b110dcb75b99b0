//! Database models for monthly closures.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fleetdesk_core::closures::{MonthlyClosure, ReconciliationResult};
use fleetdesk_core::statements::StatementRefs;

use crate::convert::parse_timestamp_tolerant;

/// Database model for monthly closures. The reconciliation result is a
/// JSON document; the three statement references are plain columns so a
/// single source can be replaced without touching the others.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::monthly_closures)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MonthlyClosureDB {
    pub id: String,
    pub driver_id: String,
    pub year: i32,
    pub month: i32,
    pub bank_statement: Option<String>,
    pub freenow_statement: Option<String>,
    pub uber_statement: Option<String>,
    pub result: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MonthlyClosureDB> for MonthlyClosure {
    fn from(db: MonthlyClosureDB) -> Self {
        let result: Option<ReconciliationResult> = db.result.as_deref().and_then(|json| {
            serde_json::from_str(json)
                .map_err(|e| {
                    log::error!(
                        "Failed to parse monthly_closures.result for {}: {}. Treating as unprocessed.",
                        db.id,
                        e
                    );
                })
                .ok()
        });
        Self {
            created_at: parse_timestamp_tolerant(&db.created_at, "monthly_closures.created_at"),
            updated_at: parse_timestamp_tolerant(&db.updated_at, "monthly_closures.updated_at"),
            id: db.id,
            driver_id: db.driver_id,
            year: db.year,
            month: db.month as u32,
            statements: StatementRefs {
                bank: db.bank_statement,
                freenow: db.freenow_statement,
                uber: db.uber_statement,
            },
            result,
        }
    }
}
