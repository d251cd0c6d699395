use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_auth;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Trades
        .route(
            "/api/trades",
            get(handlers::trades::list).post(handlers::trades::create),
        )
        .route(
            "/api/trades/:id",
            get(handlers::trades::detail)
                .put(handlers::trades::update)
                .delete(handlers::trades::delete),
        )
        // Bulk import
        .route("/api/import/csv", post(handlers::import::csv))
        // Statistics
        .route("/api/stats", get(handlers::stats::stats))
        .route("/api/stats/monthly", get(handlers::stats::monthly))
        // Analytics
        .route("/api/analytics/daily", get(handlers::analytics::daily))
        .route("/api/analytics/equity-curve", get(handlers::analytics::equity_curve))
        .route("/api/analytics/time", get(handlers::analytics::time))
        .route("/api/analytics/strategies", get(handlers::analytics::strategies))
        .route("/api/analytics/advanced-metrics", get(handlers::analytics::advanced_metrics))
        .route("/api/analytics/hold-time", get(handlers::analytics::hold_time))
        // Broker
        .route(
            "/api/tradovate/settings",
            get(handlers::tradovate::get_settings)
                .post(handlers::tradovate::save_settings)
                .delete(handlers::tradovate::delete_settings),
        )
        .route("/api/tradovate/test", post(handlers::tradovate::test_connection))
        .route("/api/tradovate/sync", post(handlers::tradovate::sync))
        .layer(middleware::from_fn(require_auth));

    // CORS: the dashboard is served from another origin in development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
