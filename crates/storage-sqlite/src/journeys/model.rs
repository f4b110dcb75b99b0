//! Database models for work-journal entries.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fleetdesk_core::journeys::{BreakInterval, Journey, NewJourney};

use crate::convert::{
    format_date, format_time, parse_date_tolerant, parse_decimal_tolerant, parse_time_tolerant,
    parse_timestamp_tolerant,
};

/// Database model for journal entries
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
#[diesel(table_name = crate::schema::journal_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JournalEntryDB {
    pub id: String,
    pub driver_id: String,
    pub entry_date: String,
    pub shift_start: String,
    pub shift_end: String,
    pub breaks: String,
    pub effective_hours: String,
    pub signature: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Changeset applied when an upsert hits an existing (driver, date) row.
///
/// Replaces the entry in full; `treat_none_as_null` clears a previously
/// stored signature when the new submission omits it. Row identity
/// (id, driver, date, created_at) is preserved.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::journal_entries)]
#[diesel(treat_none_as_null = true)]
pub struct JournalEntryChangeset {
    pub shift_start: String,
    pub shift_end: String,
    pub breaks: String,
    pub effective_hours: String,
    pub signature: Option<String>,
    pub updated_at: String,
}

impl JournalEntryDB {
    pub fn from_new(
        id: String,
        driver_id: &str,
        now: String,
        entry: &NewJourney,
        breaks_json: String,
    ) -> Self {
        Self {
            id,
            driver_id: driver_id.to_string(),
            entry_date: format_date(entry.date),
            shift_start: format_time(entry.shift_start),
            shift_end: format_time(entry.shift_end),
            breaks: breaks_json,
            effective_hours: entry.effective_hours.to_string(),
            signature: entry.signature.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn replacement(&self) -> JournalEntryChangeset {
        JournalEntryChangeset {
            shift_start: self.shift_start.clone(),
            shift_end: self.shift_end.clone(),
            breaks: self.breaks.clone(),
            effective_hours: self.effective_hours.clone(),
            signature: self.signature.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// Builds the domain model, joining in the driver's display fields.
    pub fn into_domain(self, driver_name: String, license: String) -> Journey {
        let breaks: Vec<BreakInterval> = serde_json::from_str(&self.breaks).unwrap_or_else(|e| {
            log::error!(
                "Failed to parse journal_entries.breaks '{}': {}. Falling back to none.",
                self.breaks,
                e
            );
            Vec::new()
        });
        Journey {
            date: parse_date_tolerant(&self.entry_date, "journal_entries.entry_date"),
            shift_start: parse_time_tolerant(&self.shift_start, "journal_entries.shift_start"),
            shift_end: parse_time_tolerant(&self.shift_end, "journal_entries.shift_end"),
            effective_hours: parse_decimal_tolerant(
                &self.effective_hours,
                "journal_entries.effective_hours",
            ),
            created_at: parse_timestamp_tolerant(&self.created_at, "journal_entries.created_at"),
            updated_at: parse_timestamp_tolerant(&self.updated_at, "journal_entries.updated_at"),
            id: self.id,
            driver_id: self.driver_id,
            breaks,
            signature: self.signature,
            driver_name,
            license,
        }
    }
}
