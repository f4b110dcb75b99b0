//! Work-journal domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DAILY_HOURS_CAP;
use crate::errors::ValidationError;

/// A rest interval inside a shift, as clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Domain model representing one work-journal day, carrying the driver's
/// display fields for listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: String,
    pub driver_id: String,
    pub date: NaiveDate,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub breaks: Vec<BreakInterval>,
    pub effective_hours: Decimal,
    pub signature: Option<String>,
    pub driver_name: String,
    pub license: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for recording one journal day
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewJourney {
    pub date: NaiveDate,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    #[serde(default)]
    pub breaks: Vec<BreakInterval>,
    pub effective_hours: Decimal,
    #[serde(default)]
    pub signature: Option<String>,
}

impl NewJourney {
    /// Checks the daily cap on effective hours. Runs before anything is
    /// written; an over-cap day must leave no trace.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.effective_hours < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "effective hours cannot be negative".to_string(),
            ));
        }
        if self.effective_hours > DAILY_HOURS_CAP {
            return Err(ValidationError::HoursCapExceeded {
                hours: self.effective_hours,
                cap: DAILY_HOURS_CAP,
            });
        }
        Ok(())
    }
}
