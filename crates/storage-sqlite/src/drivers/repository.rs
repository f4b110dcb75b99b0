use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use fleetdesk_core::drivers::{Driver, DriverRepositoryTrait, NewDriver};
use fleetdesk_core::Result;

use super::model::{DriverDB, NewDriverDB};
use crate::convert::now_rfc3339;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::drivers;

pub struct DriverRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DriverRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DriverRepository { pool, writer }
    }
}

#[async_trait]
impl DriverRepositoryTrait for DriverRepository {
    fn find_by_national_id(&self, national_id: &str) -> Result<Option<Driver>> {
        let mut conn = get_connection(&self.pool)?;
        let driver_db = drivers::table
            .filter(drivers::national_id.eq(national_id))
            .first::<DriverDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(driver_db.map(Driver::from))
    }

    fn find_by_id(&self, driver_id: &str) -> Result<Option<Driver>> {
        let mut conn = get_connection(&self.pool)?;
        let driver_db = drivers::table
            .find(driver_id)
            .first::<DriverDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(driver_db.map(Driver::from))
    }

    fn list(&self) -> Result<Vec<Driver>> {
        let mut conn = get_connection(&self.pool)?;
        let drivers_db = drivers::table
            .order(drivers::display_name.asc())
            .load::<DriverDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(drivers_db.into_iter().map(Driver::from).collect())
    }

    async fn insert_if_absent(&self, new_driver: NewDriver) -> Result<bool> {
        self.writer
            .exec(move |conn| -> Result<bool> {
                let new_driver_db = NewDriverDB::from_domain(
                    Uuid::new_v4().to_string(),
                    now_rfc3339(),
                    new_driver,
                );
                let inserted = diesel::insert_into(drivers::table)
                    .values(&new_driver_db)
                    .on_conflict(drivers::national_id)
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted > 0)
            })
            .await
    }
}
