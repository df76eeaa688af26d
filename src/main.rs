//! Ranking Service — Binary Entrypoint
//! Boots the Axum HTTP preview server with ranking, insights and metrics routes.

use contextual_action_ranker::{api, metrics::Metrics, telemetry, RankingConfig};
use shuttle_axum::ShuttleAxum;
use std::sync::Arc;
use tracing::warn;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    telemetry::init_dev_tracing();

    let config = RankingConfig::load_or_default();
    let state = api::AppState::new(config, Arc::new(contextual_action_ranker::SystemClock));
    let mut router = api::router(state);

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(target: "ranker", error = %e, "metrics disabled"),
    }

    Ok(router.into())
}
