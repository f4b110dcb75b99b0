//! Settlement domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COMPANY, DEFAULT_TARIFF_TIER};
use crate::drivers::Session;
use crate::errors::ValidationError;

/// Domain model representing one daily settlement, carrying the driver's
/// display name for listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: String,
    pub driver_id: String,
    pub date: NaiveDate,
    pub license: String,
    pub company: String,
    pub shift_label: String,
    pub closing_number: Option<i32>,
    pub rides: i32,
    pub kilometers: Decimal,
    pub tickets: i32,
    pub tariff_tier: String,
    pub takings: Decimal,
    pub internal_services: Decimal,
    pub toll_incidents: Decimal,
    pub card_fees: Decimal,
    pub subscriber_revenue: Decimal,
    pub fuel: Decimal,
    pub gas: Decimal,
    pub other_expenses: Decimal,
    pub salary_adjustment: Decimal,
    pub garnishment: Decimal,
    pub company_due: Decimal,
    pub driver_share: Decimal,
    pub notes: Option<String>,
    pub driver_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for recording one daily settlement.
///
/// Monetary fields default to zero when omitted. A client-supplied
/// `companyDue` is accepted for wire compatibility but never stored; see
/// [`NewSettlement::computed_company_due`].
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSettlement {
    pub date: NaiveDate,
    pub shift_label: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub closing_number: Option<i32>,
    #[serde(default)]
    pub rides: i32,
    #[serde(default)]
    pub kilometers: Decimal,
    #[serde(default)]
    pub tickets: i32,
    #[serde(default)]
    pub tariff_tier: Option<String>,
    #[serde(default)]
    pub takings: Decimal,
    #[serde(default)]
    pub internal_services: Decimal,
    #[serde(default)]
    pub toll_incidents: Decimal,
    #[serde(default)]
    pub card_fees: Decimal,
    #[serde(default)]
    pub subscriber_revenue: Decimal,
    #[serde(default)]
    pub fuel: Decimal,
    #[serde(default)]
    pub gas: Decimal,
    #[serde(default)]
    pub other_expenses: Decimal,
    #[serde(default)]
    pub salary_adjustment: Decimal,
    #[serde(default)]
    pub garnishment: Decimal,
    #[serde(default)]
    pub company_due: Option<Decimal>,
    #[serde(default)]
    pub driver_share: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSettlement {
    /// Amount owed to the company for the day: takings plus internal
    /// services plus toll/incident charges, minus operating costs (fuel,
    /// gas, other expenses), minus salary regulation and garnishment.
    ///
    /// Card fees, subscriber revenue and the driver's share are recorded
    /// but do not enter this amount.
    pub fn computed_company_due(&self) -> Decimal {
        self.takings + self.internal_services + self.toll_incidents
            - (self.fuel + self.gas + self.other_expenses)
            - self.salary_adjustment
            - self.garnishment
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.shift_label.trim().is_empty() {
            return Err(ValidationError::MissingField("shiftLabel".to_string()));
        }
        Ok(())
    }
}

/// Fully resolved settlement write: session identity applied, defaults
/// filled, `company_due` recomputed.
#[derive(Debug, Clone)]
pub struct SettlementUpsert {
    pub driver_id: String,
    pub date: NaiveDate,
    pub license: String,
    pub company: String,
    pub shift_label: String,
    pub closing_number: Option<i32>,
    pub rides: i32,
    pub kilometers: Decimal,
    pub tickets: i32,
    pub tariff_tier: String,
    pub takings: Decimal,
    pub internal_services: Decimal,
    pub toll_incidents: Decimal,
    pub card_fees: Decimal,
    pub subscriber_revenue: Decimal,
    pub fuel: Decimal,
    pub gas: Decimal,
    pub other_expenses: Decimal,
    pub salary_adjustment: Decimal,
    pub garnishment: Decimal,
    pub company_due: Decimal,
    pub driver_share: Decimal,
    pub notes: Option<String>,
}

impl SettlementUpsert {
    /// Builds the write model from the caller's identity and the submitted
    /// input. License and driver come from the session, never the body.
    pub fn resolve(caller: &Session, input: NewSettlement) -> Self {
        let company_due = input.computed_company_due();
        Self {
            driver_id: caller.driver_id.clone(),
            date: input.date,
            license: caller.license.clone(),
            company: input
                .company
                .unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
            shift_label: input.shift_label,
            closing_number: input.closing_number,
            rides: input.rides,
            kilometers: input.kilometers,
            tickets: input.tickets,
            tariff_tier: input
                .tariff_tier
                .unwrap_or_else(|| DEFAULT_TARIFF_TIER.to_string()),
            takings: input.takings,
            internal_services: input.internal_services,
            toll_incidents: input.toll_incidents,
            card_fees: input.card_fees,
            subscriber_revenue: input.subscriber_revenue,
            fuel: input.fuel,
            gas: input.gas,
            other_expenses: input.other_expenses,
            salary_adjustment: input.salary_adjustment,
            garnishment: input.garnishment,
            company_due,
            driver_share: input.driver_share,
            notes: input.notes,
        }
    }
}
