use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Dedup ledger row. `external_id` carries a storage-level unique index;
/// the row is removed together with its trade (FK cascade).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImportRecord {
    pub id: Uuid,
    pub external_id: String,
    pub source: String,
    pub trade_id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
}

/// One rejected input row from a batch source, attributed to its
/// originating line (1-based, counting the header).
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Outcome of a batch import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub row_errors: Vec<RowError>,
}
