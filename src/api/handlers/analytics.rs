use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::analytics;
use crate::db::trade_repo;
use crate::errors::AppError;
use crate::AppState;

pub async fn daily(
    State(state): State<AppState>,
) -> Result<Json<Vec<analytics::BucketStats>>, AppError> {
    let trades = trade_repo::closed_trades(&state.db).await?;
    Ok(Json(analytics::daily(&trades)))
}

pub async fn equity_curve(
    State(state): State<AppState>,
) -> Result<Json<Vec<analytics::EquityPoint>>, AppError> {
    let trades = trade_repo::closed_trades(&state.db).await?;
    Ok(Json(analytics::equity_curve(&trades)))
}

#[derive(Serialize)]
pub struct TimeAnalysis {
    pub by_hour: Vec<analytics::BucketStats>,
    pub by_day: Vec<analytics::BucketStats>,
}

pub async fn time(State(state): State<AppState>) -> Result<Json<TimeAnalysis>, AppError> {
    let trades = trade_repo::closed_trades(&state.db).await?;

    Ok(Json(TimeAnalysis {
        by_hour: analytics::by_hour(&trades),
        by_day: analytics::by_day_of_week(&trades),
    }))
}

pub async fn strategies(
    State(state): State<AppState>,
) -> Result<Json<Vec<analytics::GroupStats>>, AppError> {
    let trades = trade_repo::closed_trades(&state.db).await?;
    Ok(Json(analytics::by_strategy(&trades)))
}

pub async fn advanced_metrics(
    State(state): State<AppState>,
) -> Result<Json<analytics::AdvancedMetrics>, AppError> {
    let trades = trade_repo::closed_trades(&state.db).await?;
    Ok(Json(analytics::advanced_metrics(&trades)))
}

pub async fn hold_time(
    State(state): State<AppState>,
) -> Result<Json<analytics::HoldTimeStats>, AppError> {
    let trades = trade_repo::closed_trades(&state.db).await?;
    Ok(Json(analytics::hold_time(&trades)))
}
