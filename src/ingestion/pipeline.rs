use std::time::Instant;

use metrics::{counter, histogram};
use sqlx::PgPool;
use thiserror::Error;

use crate::db::{import_repo, trade_repo};
use crate::models::{ImportSource, ImportSummary, RowError, TradeCandidate};

use super::csv::{self, CsvError};
use super::normalizer;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Batch-level rejection (bad header, unreadable file).
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Persist candidates sequentially in input order, one transaction per
/// candidate covering the trade insert and the ledger write together.
///
/// The ledger pre-check turns reruns into cheap skips; losing the insert
/// race to a concurrent import surfaces as a unique violation and is
/// counted as a skip as well. Returns (inserted, skipped).
pub async fn import_candidates(
    pool: &PgPool,
    source: ImportSource,
    candidates: Vec<TradeCandidate>,
) -> anyhow::Result<(usize, usize)> {
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for candidate in &candidates {
        let external_id = candidate
            .external_id
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("import candidate without external id"))?;

        if import_repo::exists(pool, external_id).await? {
            skipped += 1;
            counter!("trades_import_skipped_total").increment(1);
            continue;
        }

        let mut tx = pool.begin().await?;
        let trade = trade_repo::insert_trade(&mut *tx, candidate).await?;

        match import_repo::record(&mut *tx, external_id, source, trade.id).await {
            Ok(()) => {
                tx.commit().await?;
                inserted += 1;
                counter!("trades_imported_total").increment(1);
            }
            Err(e) if import_repo::is_unique_violation(&e) => {
                tx.rollback().await?;
                skipped += 1;
                counter!("trades_import_skipped_total").increment(1);
                tracing::debug!(
                    external_id = external_id,
                    "Lost import race, counting as skipped"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok((inserted, skipped))
}

/// Full CSV import: parse, normalize row by row, then import. A missing
/// required column rejects the whole batch; everything row-shaped lands in
/// `row_errors` without stopping the rest of the file.
pub async fn import_csv(pool: &PgPool, text: &str) -> Result<ImportSummary, ImportError> {
    let start = Instant::now();
    let parsed = csv::parse(text)?;

    let mut row_errors: Vec<RowError> = parsed.errors;
    let mut candidates: Vec<TradeCandidate> = Vec::with_capacity(parsed.rows.len());

    for (line, draft) in &parsed.rows {
        match normalizer::normalize(draft) {
            Ok(mut candidate) => {
                candidate.external_id = Some(normalizer::csv_external_id(&candidate));
                candidates.push(candidate);
            }
            Err(e) => {
                counter!("trades_import_row_errors_total").increment(1);
                row_errors.push(RowError {
                    line: *line,
                    message: e.to_string(),
                });
            }
        }
    }

    let (inserted, skipped) = import_candidates(pool, ImportSource::Csv, candidates).await?;

    row_errors.sort_by_key(|e| e.line);
    let summary = ImportSummary {
        inserted,
        skipped,
        row_errors,
    };

    histogram!("import_batch_seconds").record(start.elapsed().as_secs_f64());
    tracing::info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        row_errors = summary.row_errors.len(),
        "CSV import finished"
    );

    Ok(summary)
}
