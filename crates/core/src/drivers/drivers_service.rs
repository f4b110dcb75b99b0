//! Driver account service: authentication, listings, seed provisioning.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use log::info;
use rand::rngs::OsRng;

use crate::drivers::drivers_model::{Driver, DriverSummary, NewDriver, SeedDriver, Session};
use crate::drivers::drivers_traits::{DriverRepositoryTrait, DriverServiceTrait};
use crate::errors::{Error, Result};

/// Service for authenticating accounts and managing the provisioned set.
pub struct DriverService {
    repository: Arc<dyn DriverRepositoryTrait>,
    /// Verified when a login names an unknown national ID, so lookup misses
    /// take as long as wrong passwords.
    dummy_hash: String,
}

impl DriverService {
    pub fn new(repository: Arc<dyn DriverRepositoryTrait>) -> Result<Self> {
        let dummy_hash = hash_password("fleetdesk-unknown-account")?;
        Ok(Self {
            repository,
            dummy_hash,
        })
    }
}

/// Canonical form of a national ID: trimmed and upper-cased.
fn normalize_national_id(national_id: &str) -> String {
    national_id.trim().to_uppercase()
}

/// Hashes a clear-text password with salted Argon2id (default parameters).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Unexpected(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[async_trait]
impl DriverServiceTrait for DriverService {
    fn authenticate(&self, national_id: &str, password: &str) -> Result<Session> {
        let national_id = normalize_national_id(national_id);
        match self.repository.find_by_national_id(&national_id)? {
            Some(driver) if verify_password(password, &driver.password_hash) => Ok(Session {
                driver_id: driver.id,
                display_name: driver.display_name,
                license: driver.license,
                role: driver.role,
            }),
            Some(_) => Err(Error::Authentication),
            None => {
                let _ = verify_password(password, &self.dummy_hash);
                Err(Error::Authentication)
            }
        }
    }

    fn get_driver(&self, driver_id: &str) -> Result<Driver> {
        self.repository
            .find_by_id(driver_id)?
            .ok_or_else(|| Error::NotFound(format!("Driver {}", driver_id)))
    }

    fn list_drivers(&self, caller: &Session) -> Result<Vec<DriverSummary>> {
        caller.require_admin()?;
        let drivers = self.repository.list()?;
        Ok(drivers.iter().map(Driver::summary).collect())
    }

    async fn provision(&self, seeds: &[SeedDriver]) -> Result<usize> {
        let mut created = 0;
        for seed in seeds {
            let national_id = normalize_national_id(seed.national_id);
            if self.repository.find_by_national_id(&national_id)?.is_some() {
                continue;
            }
            let new_driver = NewDriver {
                national_id,
                password_hash: hash_password(seed.password)?,
                display_name: seed.display_name.to_string(),
                license: seed.license.to_string(),
                vehicle_owner: seed.vehicle_owner.to_string(),
                role: seed.role,
            };
            if self.repository.insert_if_absent(new_driver).await? {
                created += 1;
            }
        }
        if created > 0 {
            info!("Provisioned {} account(s)", created);
        }
        Ok(created)
    }
}
