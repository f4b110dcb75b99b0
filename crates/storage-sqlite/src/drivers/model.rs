//! Database models for driver accounts.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fleetdesk_core::drivers::{Driver, NewDriver, Role};

use crate::convert::parse_timestamp_tolerant;

/// Database model for drivers
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
#[diesel(table_name = crate::schema::drivers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DriverDB {
    pub id: String,
    pub national_id: String,
    pub password_hash: String,
    pub display_name: String,
    pub license: String,
    pub vehicle_owner: String,
    pub role: String,
    pub created_at: String,
}

/// Database model for inserting a driver account
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::drivers)]
pub struct NewDriverDB {
    pub id: String,
    pub national_id: String,
    pub password_hash: String,
    pub display_name: String,
    pub license: String,
    pub vehicle_owner: String,
    pub role: String,
    pub created_at: String,
}

impl From<DriverDB> for Driver {
    fn from(db: DriverDB) -> Self {
        Self {
            created_at: parse_timestamp_tolerant(&db.created_at, "drivers.created_at"),
            id: db.id,
            national_id: db.national_id,
            password_hash: db.password_hash,
            display_name: db.display_name,
            license: db.license,
            vehicle_owner: db.vehicle_owner,
            role: Role::from_label(&db.role),
        }
    }
}

impl NewDriverDB {
    pub fn from_domain(id: String, created_at: String, domain: NewDriver) -> Self {
        Self {
            id,
            national_id: domain.national_id,
            password_hash: domain.password_hash,
            display_name: domain.display_name,
            license: domain.license,
            vehicle_owner: domain.vehicle_owner,
            role: domain.role.as_str().to_string(),
            created_at,
        }
    }
}
