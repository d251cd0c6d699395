use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::analytics;
use crate::db::trade_repo;
use crate::errors::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct StatsResponse {
    pub overall: analytics::OverallStats,
    pub by_symbol: Vec<analytics::GroupStats>,
}

/// Headline stats plus the per-symbol breakdown, matching the journal's
/// summary page.
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let trades = trade_repo::list_trades(&state.db, None).await?;

    Ok(Json(StatsResponse {
        overall: analytics::overall(&trades),
        by_symbol: analytics::by_symbol(&trades),
    }))
}

pub async fn monthly(
    State(state): State<AppState>,
) -> Result<Json<Vec<analytics::BucketStats>>, AppError> {
    let trades = trade_repo::closed_trades(&state.db).await?;
    Ok(Json(analytics::monthly(&trades)))
}
