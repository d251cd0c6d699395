use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{RowError, TradeDraft};

/// Columns that must exist in the header row. A file without them is
/// rejected as a whole; an individual row missing a value in one of them
/// only fails that row.
const REQUIRED_COLUMNS: &[&str] = &["symbol", "type", "entry_date", "entry_price", "quantity"];

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("failed to read CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Successfully coerced rows plus the rows that failed coercion. Line
/// numbers are 1-based and count the header, matching what a user sees in
/// their spreadsheet.
#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub rows: Vec<(usize, TradeDraft)>,
    pub errors: Vec<RowError>,
}

/// Parse CSV text into trade drafts.
///
/// Coercion failures (unparseable numbers or dates) are collected per row;
/// missing values in required columns are left as None for the normalizer
/// to report, so all row-level problems surface through one error channel.
pub fn parse(text: &str) -> Result<ParsedCsv, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut columns: HashMap<String, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        columns.insert(name.trim().to_lowercase(), idx);
    }

    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(*required) {
            return Err(CsvError::MissingColumn((*required).to_string()));
        }
    }

    let mut parsed = ParsedCsv::default();

    for (i, record) in reader.records().enumerate() {
        let line = i + 2; // line 1 is the header
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                parsed.errors.push(RowError {
                    line,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let value = |name: &str| -> Option<&str> {
            columns
                .get(name)
                .and_then(|&idx| record.get(idx))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let draft = (|| -> Result<TradeDraft, String> {
            Ok(TradeDraft {
                symbol: value("symbol").map(str::to_string),
                direction: value("type").map(str::to_string),
                entry_time: value("entry_date")
                    .map(|v| parse_datetime("entry_date", v))
                    .transpose()?,
                exit_time: value("exit_date")
                    .map(|v| parse_datetime("exit_date", v))
                    .transpose()?,
                entry_price: value("entry_price")
                    .map(|v| parse_decimal("entry_price", v))
                    .transpose()?,
                exit_price: value("exit_price")
                    .map(|v| parse_decimal("exit_price", v))
                    .transpose()?,
                quantity: value("quantity")
                    .map(|v| {
                        v.parse::<i64>()
                            .map_err(|_| format!("invalid quantity: {v:?}"))
                    })
                    .transpose()?,
                fees: value("fees")
                    .map(|v| parse_decimal("fees", v))
                    .transpose()?,
                stop_loss: value("stop_loss")
                    .map(|v| parse_decimal("stop_loss", v))
                    .transpose()?,
                take_profit: value("take_profit")
                    .map(|v| parse_decimal("take_profit", v))
                    .transpose()?,
                strategy: value("strategy").map(str::to_string),
                notes: value("notes").map(str::to_string),
            })
        })();

        match draft {
            Ok(draft) => parsed.rows.push((line, draft)),
            Err(message) => parsed.errors.push(RowError { line, message }),
        }
    }

    Ok(parsed)
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    raw.parse::<Decimal>()
        .map_err(|_| format!("invalid {field}: {raw:?}"))
}

/// Accepts a plain date (taken as midnight UTC) or a full RFC 3339
/// timestamp.
fn parse_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid {field}: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "symbol,type,entry_date,entry_price,exit_price,quantity,fees,strategy,notes\n";

    #[test]
    fn test_parses_rows_into_drafts() {
        let text = format!(
            "{HEADER}AAPL,LONG,2025-01-15,150.00,155.00,100,2.50,Breakout,Sample\n\
             TSLA,SHORT,2025-01-17,250.00,,50,,,\n"
        );
        let parsed = parse(&text).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.errors.is_empty());

        let (line, first) = &parsed.rows[0];
        assert_eq!(*line, 2);
        assert_eq!(first.symbol.as_deref(), Some("AAPL"));
        assert_eq!(first.exit_price, Some(Decimal::from(155)));

        let (_, second) = &parsed.rows[1];
        assert_eq!(second.exit_price, None);
        assert_eq!(second.fees, None);
    }

    #[test]
    fn test_missing_required_column_rejects_batch() {
        let text = "symbol,type,entry_price,quantity\nAAPL,LONG,150,100\n";
        match parse(text) {
            Err(CsvError::MissingColumn(col)) => assert_eq!(col, "entry_date"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_numeric_fails_only_that_row() {
        let text = format!(
            "{HEADER}AAPL,LONG,2025-01-15,abc,155.00,100,,,\n\
             MSFT,LONG,2025-01-16,410.00,,25,,,\n"
        );
        let parsed = parse(&text).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].1.symbol.as_deref(), Some("MSFT"));
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
        assert!(parsed.errors[0].message.contains("entry_price"));
    }

    #[test]
    fn test_full_timestamps_accepted() {
        let text = format!("{HEADER}NQ,LONG,2025-03-10T14:30:00Z,15000,,2,,,\n");
        let parsed = parse(&text).unwrap();
        let entry = parsed.rows[0].1.entry_time.unwrap();
        assert_eq!(entry.to_rfc3339(), "2025-03-10T14:30:00+00:00");
    }

    #[test]
    fn test_empty_required_cell_left_for_normalizer() {
        let text = format!("{HEADER},LONG,2025-01-15,150,,100,,,\n");
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].1.symbol, None);
    }
}
