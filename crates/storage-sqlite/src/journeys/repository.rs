use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use fleetdesk_core::errors::{DatabaseError, Error};
use fleetdesk_core::journeys::{Journey, JourneyRepositoryTrait, NewJourney};
use fleetdesk_core::Result;

use super::model::JournalEntryDB;
use crate::convert::{format_date, now_rfc3339};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{drivers, journal_entries};

pub struct JourneyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl JourneyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        JourneyRepository { pool, writer }
    }

    fn load_ordered(
        &self,
        driver_filter: Option<&str>,
    ) -> Result<Vec<(JournalEntryDB, String, String)>> {
        let mut conn = get_connection(&self.pool)?;
        let query = journal_entries::table
            .inner_join(drivers::table)
            .select((
                JournalEntryDB::as_select(),
                drivers::display_name,
                drivers::license,
            ))
            .order(journal_entries::entry_date.desc())
            .into_boxed();
        let query = match driver_filter {
            Some(driver_id) => query.filter(journal_entries::driver_id.eq(driver_id.to_string())),
            None => query,
        };
        query
            .load::<(JournalEntryDB, String, String)>(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }
}

#[async_trait]
impl JourneyRepositoryTrait for JourneyRepository {
    async fn upsert(&self, driver_id: &str, entry: NewJourney) -> Result<Journey> {
        let driver_id = driver_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Journey> {
                let breaks_json =
                    serde_json::to_string(&entry.breaks).map_err(StorageError::from)?;
                let row = JournalEntryDB::from_new(
                    Uuid::new_v4().to_string(),
                    &driver_id,
                    now_rfc3339(),
                    &entry,
                    breaks_json,
                );
                diesel::insert_into(journal_entries::table)
                    .values(&row)
                    .on_conflict((journal_entries::driver_id, journal_entries::entry_date))
                    .do_update()
                    .set(&row.replacement())
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let (stored, driver_name, license) = journal_entries::table
                    .inner_join(drivers::table)
                    .filter(journal_entries::driver_id.eq(&driver_id))
                    .filter(journal_entries::entry_date.eq(format_date(entry.date)))
                    .select((
                        JournalEntryDB::as_select(),
                        drivers::display_name,
                        drivers::license,
                    ))
                    .first::<(JournalEntryDB, String, String)>(conn)
                    .map_err(StorageError::from)?;
                Ok(stored.into_domain(driver_name, license))
            })
            .await
            .map_err(|err| match err {
                // An FK failure here means the session names a deleted driver.
                Error::Database(DatabaseError::ForeignKeyViolation(_)) => {
                    Error::NotFound("Driver".to_string())
                }
                other => other,
            })
    }

    fn list_all(&self) -> Result<Vec<Journey>> {
        Ok(self
            .load_ordered(None)?
            .into_iter()
            .map(|(row, name, license)| row.into_domain(name, license))
            .collect())
    }

    fn list_for_driver(&self, driver_id: &str) -> Result<Vec<Journey>> {
        Ok(self
            .load_ordered(Some(driver_id))?
            .into_iter()
            .map(|(row, name, license)| row.into_domain(name, license))
            .collect())
    }
}
