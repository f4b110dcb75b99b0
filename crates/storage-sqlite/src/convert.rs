//! Tolerant conversions between TEXT columns and domain types.
//!
//! Reads never fail on a malformed cell: the value falls back to a neutral
//! default and the row is logged, so one corrupted record cannot take a
//! listing endpoint down.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use fleetdesk_core::constants::DATE_FORMAT;

pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parses a stored decimal, falling back through f64 for scientific notation.
pub fn parse_decimal_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match f64::from_str(value_str).ok().and_then(Decimal::from_f64) {
            Some(dec_val) => dec_val,
            None => {
                log::error!(
                    "Failed to parse {} '{}' as Decimal ({}). Falling back to ZERO.",
                    field_name,
                    value_str,
                    e_decimal
                );
                Decimal::ZERO
            }
        },
    }
}

pub fn parse_date_tolerant(value_str: &str, field_name: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value_str, DATE_FORMAT).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse {} '{}' as date ({}). Falling back to epoch.",
            field_name,
            value_str,
            e
        );
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
    })
}

pub fn parse_time_tolerant(value_str: &str, field_name: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value_str, TIME_FORMAT).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse {} '{}' as time ({}). Falling back to midnight.",
            field_name,
            value_str,
            e
        );
        NaiveTime::default()
    })
}

pub fn parse_timestamp_tolerant(value_str: &str, field_name: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::error!(
                "Failed to parse {} '{}' as timestamp ({}). Falling back to now.",
                field_name,
                value_str,
                e
            );
            Utc::now()
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
