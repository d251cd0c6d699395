use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::trade_repo;
use crate::errors::AppError;
use crate::ingestion::normalizer;
use crate::models::{Trade, TradeDraft};
use crate::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ApiResponse<Vec<Trade>>> {
    match trade_repo::list_trades(&state.db, params.status.as_deref()).await {
        Ok(trades) => Json(ApiResponse::ok(trades)),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trade>, AppError> {
    let trade = trade_repo::get_trade(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("trade {id} not found")))?;

    Ok(Json(trade))
}

/// Manual entry: normalize, persist, return the stored trade with its
/// derived status and P&L. No dedup ledger involvement.
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<TradeDraft>,
) -> Result<(StatusCode, Json<Trade>), AppError> {
    let candidate = normalizer::normalize(&draft)?;
    let trade = trade_repo::insert_trade(&state.db, &candidate).await?;

    tracing::info!(id = %trade.id, symbol = %trade.symbol, "Trade created");
    Ok((StatusCode::CREATED, Json(trade)))
}

/// Explicit full-record update; the only path that moves a trade from
/// OPEN to CLOSED.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<TradeDraft>,
) -> Result<Json<Trade>, AppError> {
    let existing = trade_repo::get_trade(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("trade {id} not found")))?;

    let candidate = normalizer::normalize(&draft)?;
    normalizer::ensure_no_reopen(&existing, &candidate)?;

    let trade = trade_repo::update_trade(&state.db, id, &candidate)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("trade {id} not found")))?;

    Ok(Json(trade))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = trade_repo::delete_trade(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("trade {id} not found")));
    }

    tracing::info!(id = %id, "Trade deleted");
    Ok(Json(json!({ "success": true, "message": "Trade deleted" })))
}
