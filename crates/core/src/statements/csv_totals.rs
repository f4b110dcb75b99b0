//! Declared-totals extraction from CSV statement exports.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::errors::Result;
use crate::statements::statements_errors::StatementError;
use crate::statements::statements_model::{DeclaredTotals, StatementSource};
use crate::statements::statements_traits::{StatementParserTrait, StatementStoreTrait};

/// Header labels that mark the amount column, checked case-insensitively.
const AMOUNT_HEADERS: [&str; 3] = ["total", "importe", "amount"];

/// Parses CSV statement exports and sums the amount column.
///
/// Bank and platform exports differ in layout but share the shape: a header
/// row, one row per day or ride, and an amount column. The delimiter is
/// sniffed (`,` vs `;`), amounts accept Spanish formatting (`1.234,56`),
/// and the amount column is the first header containing `total`, `importe`
/// or `amount`, else the last column.
pub struct CsvStatementParser {
    store: Arc<dyn StatementStoreTrait>,
}

impl CsvStatementParser {
    pub fn new(store: Arc<dyn StatementStoreTrait>) -> Self {
        Self { store }
    }
}

/// Picks `;` when it outnumbers `,` on the first line.
fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Normalizes an amount cell before parsing: currency symbols and spaces
/// dropped, thousands separators removed, decimal comma becomes a dot.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | ',' | '.'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    Decimal::from_str(&normalized).ok()
}

impl StatementParserTrait for CsvStatementParser {
    fn declared_totals(
        &self,
        stored_name: &str,
        _source: StatementSource,
    ) -> Result<DeclaredTotals> {
        let bytes = self.store.read(stored_name)?;
        let content = String::from_utf8_lossy(&bytes);
        let delimiter = detect_delimiter(&content);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| StatementError::Parse {
                name: stored_name.to_string(),
                reason: e.to_string(),
            })?
            .clone();
        let amount_index = headers
            .iter()
            .position(|header| {
                let lowered = header.to_lowercase();
                AMOUNT_HEADERS.iter().any(|label| lowered.contains(label))
            })
            .unwrap_or_else(|| headers.len().saturating_sub(1));

        let mut total = Decimal::ZERO;
        let mut amount_rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| StatementError::Parse {
                name: stored_name.to_string(),
                reason: e.to_string(),
            })?;
            if let Some(amount) = record.get(amount_index).and_then(parse_amount) {
                total += amount;
                amount_rows += 1;
            }
        }

        if amount_rows == 0 {
            return Err(StatementError::Parse {
                name: stored_name.to_string(),
                reason: "no amount rows found".to_string(),
            }
            .into());
        }

        Ok(DeclaredTotals { total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FixedStore(Vec<u8>);

    impl StatementStoreTrait for FixedStore {
        fn store(&self, _original_name: &str, _bytes: &[u8]) -> Result<String> {
            unimplemented!()
        }

        fn read(&self, _stored_name: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    fn totals_of(content: &[u8]) -> Result<DeclaredTotals> {
        let parser = CsvStatementParser::new(Arc::new(FixedStore(content.to_vec())));
        parser.declared_totals("statement.csv", StatementSource::Bank)
    }

    #[test]
    fn test_semicolon_spanish_amounts() {
        let totals = totals_of(
            b"Fecha;Concepto;Importe\n\
              01/01/2025;Ingreso efectivo;1.234,56\n\
              02/01/2025;Ingreso efectivo;100,00\n",
        )
        .unwrap();
        assert_eq!(totals.total, dec!(1334.56));
    }

    #[test]
    fn test_comma_delimited_total_column() {
        let totals = totals_of(
            b"date,rides,total\n\
              2025-01-01,5,100.50\n\
              2025-01-02,3,49.50\n",
        )
        .unwrap();
        assert_eq!(totals.total, dec!(150.00));
    }

    #[test]
    fn test_falls_back_to_last_column() {
        let totals = totals_of(b"dia,viajes,ganancia\n1,4,20\n2,2,10\n").unwrap();
        assert_eq!(totals.total, dec!(30));
    }

    #[test]
    fn test_skips_blank_amount_cells() {
        let totals = totals_of(b"fecha;importe\n01/01;5,00\n02/01;\n03/01;2,50\n").unwrap();
        assert_eq!(totals.total, dec!(7.50));
    }

    #[test]
    fn test_no_amount_rows_is_an_error() {
        let err = totals_of(b"fecha;importe\n").unwrap_err();
        assert!(err.to_string().contains("no amount rows"));
    }

    #[test]
    fn test_negative_and_currency_symbols() {
        let totals = totals_of("fecha;importe\n01/01;10,00 \u{20ac}\n02/01;-2,50\n".as_bytes())
            .unwrap();
        assert_eq!(totals.total, dec!(7.50));
    }
}
