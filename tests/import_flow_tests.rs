//! End-to-end ingestion flow up to the persistence boundary: CSV text →
//! parsed drafts → validated candidates with dedup keys. The ledger's
//! at-most-once behavior rests on these keys being identical across
//! reruns of the same input.

use rust_decimal::Decimal;

use tradebook::ingestion::csv;
use tradebook::ingestion::normalizer;
use tradebook::models::TradeCandidate;

const TEMPLATE: &str = "\
symbol,type,entry_date,entry_price,exit_price,quantity,fees,stop_loss,take_profit,exit_date,strategy,notes
AAPL,LONG,2025-01-15,150.00,155.00,100,2.50,145.00,160.00,2025-01-16,Breakout,Sample trade
TSLA,SHORT,2025-01-17,250.00,,50,1.50,260.00,240.00,,Reversal,Open position
";

fn normalize_all(text: &str) -> (Vec<TradeCandidate>, Vec<(usize, String)>) {
    let parsed = csv::parse(text).expect("batch should be accepted");
    let mut candidates = Vec::new();
    let mut errors: Vec<(usize, String)> = parsed
        .errors
        .iter()
        .map(|e| (e.line, e.message.clone()))
        .collect();

    for (line, draft) in &parsed.rows {
        match normalizer::normalize(draft) {
            Ok(mut candidate) => {
                candidate.external_id = Some(normalizer::csv_external_id(&candidate));
                candidates.push(candidate);
            }
            Err(e) => errors.push((*line, e.to_string())),
        }
    }

    (candidates, errors)
}

#[test]
fn test_template_file_normalizes_completely() {
    let (candidates, errors) = normalize_all(TEMPLATE);

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(candidates.len(), 2);

    let aapl = &candidates[0];
    assert_eq!(aapl.symbol, "AAPL");
    assert_eq!(aapl.status.as_str(), "CLOSED");
    // (155 - 150) * 100 - 2.50
    assert_eq!(aapl.profit_loss, Some(Decimal::new(49750, 2)));

    let tsla = &candidates[1];
    assert_eq!(tsla.status.as_str(), "OPEN");
    assert_eq!(tsla.profit_loss, None);
    assert_eq!(tsla.exit_price, None);
}

#[test]
fn test_rerun_produces_identical_external_ids() {
    let (first, _) = normalize_all(TEMPLATE);
    let (second, _) = normalize_all(TEMPLATE);

    let first_ids: Vec<_> = first.iter().map(|c| c.external_id.clone()).collect();
    let second_ids: Vec<_> = second.iter().map(|c| c.external_id.clone()).collect();

    assert_eq!(first_ids, second_ids);
    assert_eq!(
        first_ids[0].as_deref(),
        Some("csv_AAPL_2025-01-15_150.00_100")
    );
}

#[test]
fn test_distinct_rows_get_distinct_external_ids() {
    let (candidates, _) = normalize_all(TEMPLATE);
    assert_ne!(candidates[0].external_id, candidates[1].external_id);
}

#[test]
fn test_bad_rows_do_not_abort_the_batch() {
    let text = "\
symbol,type,entry_date,entry_price,quantity
AAPL,LONG,2025-01-15,150.00,100
,LONG,2025-01-16,151.00,100
MSFT,HOLD,2025-01-17,400.00,10
NVDA,SHORT,not-a-date,900.00,5
AMD,LONG,2025-01-19,160.00,20
";

    let (candidates, errors) = normalize_all(text);

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].symbol, "AAPL");
    assert_eq!(candidates[1].symbol, "AMD");

    let mut lines: Vec<usize> = errors.iter().map(|(line, _)| *line).collect();
    lines.sort_unstable();
    assert_eq!(lines, vec![3, 4, 5]);
    assert!(errors.iter().any(|(_, m)| m.contains("symbol")));
    assert!(errors.iter().any(|(_, m)| m.contains("direction")));
    assert!(errors.iter().any(|(_, m)| m.contains("entry_date")));
}

#[test]
fn test_missing_required_column_rejects_whole_file() {
    let text = "symbol,entry_date,entry_price,quantity\nAAPL,2025-01-15,150.00,100\n";
    assert!(csv::parse(text).is_err());
}
