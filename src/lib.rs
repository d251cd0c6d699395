pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod ingestion;
pub mod instruments;
pub mod metrics;
pub mod models;
pub mod pnl;
pub mod tradovate;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub http: reqwest::Client,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
