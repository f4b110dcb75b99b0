//! Driver domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Access level attached to a driver account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored role label. Unknown labels fall back to the
    /// least-privileged role.
    pub fn from_label(value: &str) -> Role {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            _ => Role::Driver,
        }
    }
}

/// Domain model representing a driver or administrator account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub national_id: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub display_name: String,
    pub license: String,
    pub vehicle_owner: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    /// Listing view of this account, credential hash stripped.
    pub fn summary(&self) -> DriverSummary {
        DriverSummary {
            id: self.id.clone(),
            national_id: self.national_id.clone(),
            display_name: self.display_name.clone(),
            license: self.license.clone(),
            vehicle_owner: self.vehicle_owner.clone(),
            role: self.role,
        }
    }
}

/// Driver account as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub id: String,
    pub national_id: String,
    pub display_name: String,
    pub license: String,
    pub vehicle_owner: String,
    pub role: Role,
}

/// Input model for inserting a driver account
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub national_id: String,
    pub password_hash: String,
    pub display_name: String,
    pub license: String,
    pub vehicle_owner: String,
    pub role: Role,
}

/// A provisioning seed: account fields plus the initial clear-text password.
#[derive(Debug, Clone)]
pub struct SeedDriver {
    pub national_id: &'static str,
    pub password: &'static str,
    pub display_name: &'static str,
    pub license: &'static str,
    pub vehicle_owner: &'static str,
    pub role: Role,
}

/// Authenticated identity handed to every downstream operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub driver_id: String,
    pub display_name: String,
    pub license: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with an authorization error unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::Authorization(
                "administrator role required".to_string(),
            ))
        }
    }

    /// Whether the caller may read records belonging to `driver_id`.
    pub fn can_view_driver(&self, driver_id: &str) -> bool {
        self.is_admin() || self.driver_id == driver_id
    }
}
