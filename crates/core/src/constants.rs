use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Legal cap on effective driving hours per journal day
pub const DAILY_HOURS_CAP: Decimal = dec!(8);

/// Company name stamped on settlements when none is supplied
pub const DEFAULT_COMPANY: &str = "PROVETAXI";

/// Tariff tier recorded on settlements when none is supplied
pub const DEFAULT_TARIFF_TIER: &str = "Básica";

/// Date format used across the HTTP surface and storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";
