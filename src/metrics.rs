use axum::{routing::get, Router};
use ::metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::rules::RuleId;

pub const RANK_REQUESTS: &str = "ranker_rank_requests_total";
pub const INSIGHTS_REQUESTS: &str = "ranker_insights_requests_total";
pub const RANKED_ACTIONS: &str = "ranker_ranked_actions";
pub const RULES_REGISTERED: &str = "ranker_rules_registered";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Fails if a recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        describe_counter!(RANK_REQUESTS, "Ranking requests served.");
        describe_counter!(INSIGHTS_REQUESTS, "Insights requests served.");
        describe_histogram!(RANKED_ACTIONS, "Actions returned per ranking request.");
        describe_gauge!(RULES_REGISTERED, "Rules in the default registry.");

        gauge!(RULES_REGISTERED).set(RuleId::ALL.len() as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
