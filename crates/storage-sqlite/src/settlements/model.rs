//! Database models for daily settlements.
//!
//! All monetary columns are TEXT-backed decimals; the column list is
//! explicit and enumerated so nothing outside it can reach storage.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use fleetdesk_core::settlements::{Settlement, SettlementUpsert};

use crate::convert::{
    format_date, parse_date_tolerant, parse_decimal_tolerant, parse_timestamp_tolerant,
};

/// Database model for settlements
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
#[diesel(table_name = crate::schema::settlements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SettlementDB {
    pub id: String,
    pub driver_id: String,
    pub entry_date: String,
    pub license: String,
    pub company: String,
    pub shift_label: String,
    pub closing_number: Option<i32>,
    pub rides: i32,
    pub kilometers: String,
    pub tickets: i32,
    pub tariff_tier: String,
    pub takings: String,
    pub internal_services: String,
    pub toll_incidents: String,
    pub card_fees: String,
    pub subscriber_revenue: String,
    pub fuel: String,
    pub gas: String,
    pub other_expenses: String,
    pub salary_adjustment: String,
    pub garnishment: String,
    pub company_due: String,
    pub driver_share: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Changeset applied when an upsert hits an existing (driver, date) row.
///
/// Replaces the settlement in full; `treat_none_as_null` clears optionals
/// the new submission omits. Row identity is preserved.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::settlements)]
#[diesel(treat_none_as_null = true)]
pub struct SettlementChangeset {
    pub license: String,
    pub company: String,
    pub shift_label: String,
    pub closing_number: Option<i32>,
    pub rides: i32,
    pub kilometers: String,
    pub tickets: i32,
    pub tariff_tier: String,
    pub takings: String,
    pub internal_services: String,
    pub toll_incidents: String,
    pub card_fees: String,
    pub subscriber_revenue: String,
    pub fuel: String,
    pub gas: String,
    pub other_expenses: String,
    pub salary_adjustment: String,
    pub garnishment: String,
    pub company_due: String,
    pub driver_share: String,
    pub notes: Option<String>,
    pub updated_at: String,
}

impl SettlementDB {
    pub fn from_upsert(id: String, now: String, upsert: &SettlementUpsert) -> Self {
        Self {
            id,
            driver_id: upsert.driver_id.clone(),
            entry_date: format_date(upsert.date),
            license: upsert.license.clone(),
            company: upsert.company.clone(),
            shift_label: upsert.shift_label.clone(),
            closing_number: upsert.closing_number,
            rides: upsert.rides,
            kilometers: upsert.kilometers.to_string(),
            tickets: upsert.tickets,
            tariff_tier: upsert.tariff_tier.clone(),
            takings: upsert.takings.to_string(),
            internal_services: upsert.internal_services.to_string(),
            toll_incidents: upsert.toll_incidents.to_string(),
            card_fees: upsert.card_fees.to_string(),
            subscriber_revenue: upsert.subscriber_revenue.to_string(),
            fuel: upsert.fuel.to_string(),
            gas: upsert.gas.to_string(),
            other_expenses: upsert.other_expenses.to_string(),
            salary_adjustment: upsert.salary_adjustment.to_string(),
            garnishment: upsert.garnishment.to_string(),
            company_due: upsert.company_due.to_string(),
            driver_share: upsert.driver_share.to_string(),
            notes: upsert.notes.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn replacement(&self) -> SettlementChangeset {
        SettlementChangeset {
            license: self.license.clone(),
            company: self.company.clone(),
            shift_label: self.shift_label.clone(),
            closing_number: self.closing_number,
            rides: self.rides,
            kilometers: self.kilometers.clone(),
            tickets: self.tickets,
            tariff_tier: self.tariff_tier.clone(),
            takings: self.takings.clone(),
            internal_services: self.internal_services.clone(),
            toll_incidents: self.toll_incidents.clone(),
            card_fees: self.card_fees.clone(),
            subscriber_revenue: self.subscriber_revenue.clone(),
            fuel: self.fuel.clone(),
            gas: self.gas.clone(),
            other_expenses: self.other_expenses.clone(),
            salary_adjustment: self.salary_adjustment.clone(),
            garnishment: self.garnishment.clone(),
            company_due: self.company_due.clone(),
            driver_share: self.driver_share.clone(),
            notes: self.notes.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// Builds the domain model, joining in the driver's display name.
    pub fn into_domain(self, driver_name: String) -> Settlement {
        Settlement {
            date: parse_date_tolerant(&self.entry_date, "settlements.entry_date"),
            kilometers: parse_decimal_tolerant(&self.kilometers, "settlements.kilometers"),
            takings: parse_decimal_tolerant(&self.takings, "settlements.takings"),
            internal_services: parse_decimal_tolerant(
                &self.internal_services,
                "settlements.internal_services",
            ),
            toll_incidents: parse_decimal_tolerant(
                &self.toll_incidents,
                "settlements.toll_incidents",
            ),
            card_fees: parse_decimal_tolerant(&self.card_fees, "settlements.card_fees"),
            subscriber_revenue: parse_decimal_tolerant(
                &self.subscriber_revenue,
                "settlements.subscriber_revenue",
            ),
            fuel: parse_decimal_tolerant(&self.fuel, "settlements.fuel"),
            gas: parse_decimal_tolerant(&self.gas, "settlements.gas"),
            other_expenses: parse_decimal_tolerant(
                &self.other_expenses,
                "settlements.other_expenses",
            ),
            salary_adjustment: parse_decimal_tolerant(
                &self.salary_adjustment,
                "settlements.salary_adjustment",
            ),
            garnishment: parse_decimal_tolerant(&self.garnishment, "settlements.garnishment"),
            company_due: parse_decimal_tolerant(&self.company_due, "settlements.company_due"),
            driver_share: parse_decimal_tolerant(&self.driver_share, "settlements.driver_share"),
            created_at: parse_timestamp_tolerant(&self.created_at, "settlements.created_at"),
            updated_at: parse_timestamp_tolerant(&self.updated_at, "settlements.updated_at"),
            id: self.id,
            driver_id: self.driver_id,
            license: self.license,
            company: self.company,
            shift_label: self.shift_label,
            closing_number: self.closing_number,
            rides: self.rides,
            tickets: self.tickets,
            tariff_tier: self.tariff_tier,
            notes: self.notes,
            driver_name,
        }
    }
}
