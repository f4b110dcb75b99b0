use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use fleetdesk_core::errors::{DatabaseError, Error};
use fleetdesk_core::settlements::{Settlement, SettlementRepositoryTrait, SettlementUpsert};
use fleetdesk_core::Result;

use super::model::SettlementDB;
use crate::convert::{format_date, now_rfc3339};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{drivers, settlements};

pub struct SettlementRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettlementRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettlementRepository { pool, writer }
    }

    fn load_ordered(&self, driver_filter: Option<&str>) -> Result<Vec<(SettlementDB, String)>> {
        let mut conn = get_connection(&self.pool)?;
        let query = settlements::table
            .inner_join(drivers::table)
            .select((SettlementDB::as_select(), drivers::display_name))
            .order(settlements::entry_date.desc())
            .into_boxed();
        let query = match driver_filter {
            Some(driver_id) => query.filter(settlements::driver_id.eq(driver_id.to_string())),
            None => query,
        };
        query
            .load::<(SettlementDB, String)>(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }
}

#[async_trait]
impl SettlementRepositoryTrait for SettlementRepository {
    async fn upsert(&self, settlement: SettlementUpsert) -> Result<Settlement> {
        self.writer
            .exec(move |conn| -> Result<Settlement> {
                let row =
                    SettlementDB::from_upsert(Uuid::new_v4().to_string(), now_rfc3339(), &settlement);
                diesel::insert_into(settlements::table)
                    .values(&row)
                    .on_conflict((settlements::driver_id, settlements::entry_date))
                    .do_update()
                    .set(&row.replacement())
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let (stored, driver_name) = settlements::table
                    .inner_join(drivers::table)
                    .filter(settlements::driver_id.eq(&settlement.driver_id))
                    .filter(settlements::entry_date.eq(format_date(settlement.date)))
                    .select((SettlementDB::as_select(), drivers::display_name))
                    .first::<(SettlementDB, String)>(conn)
                    .map_err(StorageError::from)?;
                Ok(stored.into_domain(driver_name))
            })
            .await
            .map_err(|err| match err {
                Error::Database(DatabaseError::ForeignKeyViolation(_)) => {
                    Error::NotFound("Driver".to_string())
                }
                other => other,
            })
    }

    fn list_all(&self) -> Result<Vec<Settlement>> {
        Ok(self
            .load_ordered(None)?
            .into_iter()
            .map(|(row, name)| row.into_domain(name))
            .collect())
    }

    fn list_for_driver(&self, driver_id: &str) -> Result<Vec<Settlement>> {
        Ok(self
            .load_ordered(Some(driver_id))?
            .into_iter()
            .map(|(row, name)| row.into_domain(name))
            .collect())
    }

    fn list_range(
        &self,
        driver_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Settlement>> {
        let mut conn = get_connection(&self.pool)?;
        // ISO dates sort lexicographically, so BETWEEN on TEXT is correct.
        let rows = settlements::table
            .inner_join(drivers::table)
            .filter(settlements::driver_id.eq(driver_id))
            .filter(settlements::entry_date.between(format_date(from), format_date(to)))
            .select((SettlementDB::as_select(), drivers::display_name))
            .order(settlements::entry_date.asc())
            .load::<(SettlementDB, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(row, name)| row.into_domain(name))
            .collect())
    }
}
