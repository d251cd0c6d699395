use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::db::settings_repo;
use crate::errors::AppError;
use crate::tradovate::{self, TradovateClient};
use crate::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    match settings_repo::get_settings(&state.db).await? {
        // BrokerSettings never serializes the password
        Some(settings) => Ok(Json(serde_json::to_value(&settings).unwrap_or_default())),
        None => Ok(Json(json!({ "configured": false }))),
    }
}

#[derive(Deserialize)]
pub struct SaveSettingsRequest {
    pub username: String,
    pub password: String,
    pub environment: Option<String>,
}

pub async fn save_settings(
    State(state): State<AppState>,
    Json(body): Json<SaveSettingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "username and password are required".into(),
        ));
    }

    let environment = body.environment.as_deref().unwrap_or("demo");
    if environment != "demo" && environment != "live" {
        return Err(AppError::BadRequest(format!(
            "environment must be demo or live, got {environment:?}"
        )));
    }

    settings_repo::upsert_settings(&state.db, body.username.trim(), &body.password, environment)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Broker settings saved" })))
}

pub async fn delete_settings(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    settings_repo::delete_settings(&state.db).await?;
    Ok(Json(json!({ "success": true, "message": "Broker settings deleted" })))
}

/// Verify credentials without persisting anything: authenticate and count
/// the reachable accounts.
pub async fn test_connection(
    State(state): State<AppState>,
    Json(body): Json<SaveSettingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let client = TradovateClient::new(
        state.http.clone(),
        body.environment.as_deref().unwrap_or("demo"),
    );

    let session = client.authenticate(&body.username, &body.password).await?;
    let accounts = client.list_accounts(&session).await?;

    Ok(Json(json!({
        "success": true,
        "accounts": accounts.len(),
        "user_id": session.user_id,
    })))
}

/// Manual sync run against the stored credentials.
pub async fn sync(
    State(state): State<AppState>,
) -> Result<Json<tradovate::SyncReport>, AppError> {
    let settings = settings_repo::get_settings(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("broker not configured; save credentials first".into())
        })?;

    let client = TradovateClient::new(state.http.clone(), &settings.environment);
    let report = tradovate::run_sync(&state.db, &client, &settings).await?;

    Ok(Json(report))
}
