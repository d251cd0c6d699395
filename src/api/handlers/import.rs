use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::ingestion::pipeline;
use crate::models::ImportSummary;
use crate::AppState;

/// Bulk CSV import. The request body is the raw CSV text; the response
/// reports per-run counts and line-attributed row errors. Re-posting the
/// same file only moves rows from inserted to skipped.
pub async fn csv(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = pipeline::import_csv(&state.db, &body).await?;
    Ok(Json(summary))
}
