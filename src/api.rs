//! HTTP preview surface. Stateless per request: each call builds a fresh
//! `ActionRanker` from the posted context, so sessions never share a snapshot.

use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use ::metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::action::Action;
use crate::clock::{Clock, SystemClock};
use crate::config::RankingConfig;
use crate::context::ContextModel;
use crate::engine::ActionRanker;
use crate::insights::ActionInsights;
use crate::metrics::{INSIGHTS_REQUESTS, RANKED_ACTIONS, RANK_REQUESTS};
use crate::ranking::{RankedAction, DEFAULT_LIMIT};
use crate::rules::RuleId;

#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<RankingConfig>>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: RankingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            clock,
        }
    }

    /// Config from `RANKER_CONFIG_PATH` / `config/ranking.toml` (defaults on error), system clock.
    pub fn from_env() -> Self {
        Self::new(RankingConfig::load_or_default(), Arc::new(SystemClock))
    }

    fn ranker(&self, context: ContextModel) -> ActionRanker {
        let cfg = match self.config.read() {
            Ok(g) => g.clone(),
            Err(_) => RankingConfig::default(),
        };
        ActionRanker::new(context)
            .with_clock(self.clock.clone())
            .with_config(cfg)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/rank", post(rank))
        .route("/insights", post(action_insights))
        .route("/debug/rules", post(debug_rules))
        .route("/admin/reload-config", get(admin_reload_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct RankReq {
    context: ContextModel,
    #[serde(default)]
    actions: Vec<Action>,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    infer_time_of_day: bool,
}

async fn rank(State(state): State<AppState>, Json(body): Json<RankReq>) -> Json<Vec<RankedAction>> {
    counter!(RANK_REQUESTS).increment(1);

    let limit = match body.limit {
        Some(n) => usize::try_from(n).unwrap_or(0),
        None => DEFAULT_LIMIT,
    };
    let context = if body.infer_time_of_day {
        body.context
            .with_inferred_time_of_day(state.clock.as_ref())
    } else {
        body.context
    };

    let out = state.ranker(context).rank(&body.actions, limit);
    histogram!(RANKED_ACTIONS).record(out.len() as f64);
    Json(out)
}

#[derive(Deserialize)]
struct InsightsReq {
    context: ContextModel,
    action_id: String,
}

async fn action_insights(
    State(state): State<AppState>,
    Json(body): Json<InsightsReq>,
) -> Json<ActionInsights> {
    counter!(INSIGHTS_REQUESTS).increment(1);
    Json(state.ranker(body.context).insights(&body.action_id))
}

#[derive(Deserialize)]
struct RulesReq {
    context: ContextModel,
}

#[derive(Serialize)]
struct RuleOut {
    rule: RuleId,
    value: f32,
    active: bool,
}

async fn debug_rules(State(state): State<AppState>, Json(body): Json<RulesReq>) -> Json<Vec<RuleOut>> {
    let ranker = state.ranker(body.context);
    let threshold = match state.config.read() {
        Ok(g) => g.rules.threshold,
        Err(_) => RankingConfig::default().rules.threshold,
    };
    let out = ranker
        .rule_values()
        .into_iter()
        .map(|rv| RuleOut {
            rule: rv.rule,
            value: rv.value,
            active: rv.value > threshold,
        })
        .collect();
    Json(out)
}

async fn admin_reload_config(State(state): State<AppState>) -> String {
    let fresh = match RankingConfig::from_toml() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(target: "ranker", error = %e, "config reload failed");
            return format!("failed: {e}");
        }
    };
    match state.config.write() {
        Ok(mut w) => {
            *w = fresh;
            info!(target: "ranker", "ranking config reloaded");
            "reloaded".to_string()
        }
        Err(_) => "failed: lock poisoned".to_string(),
    }
}
