use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use fleetdesk_core::closures::{ClosureRepositoryTrait, MonthlyClosure, ReconciliationResult};
use fleetdesk_core::statements::StatementRefs;
use fleetdesk_core::Result;

use super::model::MonthlyClosureDB;
use crate::convert::now_rfc3339;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::monthly_closures;

pub struct ClosureRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ClosureRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ClosureRepository { pool, writer }
    }
}

fn find_row(
    conn: &mut SqliteConnection,
    driver_id: &str,
    year: i32,
    month: u32,
) -> Result<Option<MonthlyClosureDB>> {
    monthly_closures::table
        .filter(monthly_closures::driver_id.eq(driver_id))
        .filter(monthly_closures::year.eq(year))
        .filter(monthly_closures::month.eq(month as i32))
        .first::<MonthlyClosureDB>(conn)
        .optional()
        .map_err(|e| StorageError::from(e).into())
}

fn new_row(driver_id: &str, year: i32, month: u32) -> MonthlyClosureDB {
    let now = now_rfc3339();
    MonthlyClosureDB {
        id: Uuid::new_v4().to_string(),
        driver_id: driver_id.to_string(),
        year,
        month: month as i32,
        bank_statement: None,
        freenow_statement: None,
        uber_statement: None,
        result: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[async_trait]
impl ClosureRepositoryTrait for ClosureRepository {
    fn find(&self, driver_id: &str, year: i32, month: u32) -> Result<Option<MonthlyClosure>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(find_row(&mut conn, driver_id, year, month)?.map(MonthlyClosure::from))
    }

    fn list_for_driver(&self, driver_id: &str) -> Result<Vec<MonthlyClosure>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = monthly_closures::table
            .filter(monthly_closures::driver_id.eq(driver_id))
            .order((monthly_closures::year.desc(), monthly_closures::month.desc()))
            .load::<MonthlyClosureDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(MonthlyClosure::from).collect())
    }

    async fn attach_statements(
        &self,
        driver_id: &str,
        year: i32,
        month: u32,
        refs: &StatementRefs,
    ) -> Result<MonthlyClosure> {
        let driver_id = driver_id.to_string();
        let refs = refs.clone();
        self.writer
            .exec(move |conn| -> Result<MonthlyClosure> {
                let mut row = find_row(conn, &driver_id, year, month)?
                    .unwrap_or_else(|| new_row(&driver_id, year, month));
                // Only the uploaded sources replace their stored reference.
                if let Some(name) = refs.bank.clone() {
                    row.bank_statement = Some(name);
                }
                if let Some(name) = refs.freenow.clone() {
                    row.freenow_statement = Some(name);
                }
                if let Some(name) = refs.uber.clone() {
                    row.uber_statement = Some(name);
                }
                row.updated_at = now_rfc3339();

                diesel::insert_into(monthly_closures::table)
                    .values(&row)
                    .on_conflict((
                        monthly_closures::driver_id,
                        monthly_closures::year,
                        monthly_closures::month,
                    ))
                    .do_update()
                    .set((
                        monthly_closures::bank_statement.eq(row.bank_statement.clone()),
                        monthly_closures::freenow_statement.eq(row.freenow_statement.clone()),
                        monthly_closures::uber_statement.eq(row.uber_statement.clone()),
                        monthly_closures::updated_at.eq(row.updated_at.clone()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(MonthlyClosure::from(row))
            })
            .await
    }

    async fn save_result(
        &self,
        driver_id: &str,
        year: i32,
        month: u32,
        result: &ReconciliationResult,
    ) -> Result<MonthlyClosure> {
        let driver_id = driver_id.to_string();
        let result_json = serde_json::to_string(result).map_err(StorageError::from)?;
        self.writer
            .exec(move |conn| -> Result<MonthlyClosure> {
                let mut row = find_row(conn, &driver_id, year, month)?
                    .unwrap_or_else(|| new_row(&driver_id, year, month));
                // Statement references stay as stored; only the result is replaced.
                row.result = Some(result_json);
                row.updated_at = now_rfc3339();

                diesel::insert_into(monthly_closures::table)
                    .values(&row)
                    .on_conflict((
                        monthly_closures::driver_id,
                        monthly_closures::year,
                        monthly_closures::month,
                    ))
                    .do_update()
                    .set((
                        monthly_closures::result.eq(row.result.clone()),
                        monthly_closures::updated_at.eq(row.updated_at.clone()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(MonthlyClosure::from(row))
            })
            .await
    }
}
