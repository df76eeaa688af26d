use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::context::ContextModel;

#[derive(Debug, Clone, Deserialize)]
struct InsightEntry {
    best_times: Vec<String>,
    #[serde(default)]
    complementary_actions: Vec<String>,
}

static TABLE: Lazy<HashMap<String, InsightEntry>> = Lazy::new(|| {
    let raw = include_str!("../insights.json");
    serde_json::from_str::<HashMap<String, InsightEntry>>(raw).expect("valid insights table")
});

/// Read-only usage facts about one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInsights {
    pub best_times: Vec<String>,
    pub complementary_actions: Vec<String>,
    pub frequency: usize,
    pub effectiveness: f32,
}

/// Placeholder effectiveness: grows with use, capped at 1.0.
pub fn effectiveness(frequency: usize) -> f32 {
    (0.5 + frequency as f32 * 0.1).min(1.0)
}

/// Look up insights for `action_id`. Unknown ids get `["anytime"]` and no pairings.
pub fn insights(action_id: &str, ctx: &ContextModel) -> ActionInsights {
    let frequency = ctx.frequency_of(action_id);
    let (best_times, complementary_actions) = match TABLE.get(action_id) {
        Some(e) => (e.best_times.clone(), e.complementary_actions.clone()),
        None => (vec!["anytime".to_string()], Vec::new()),
    };
    ActionInsights {
        best_times,
        complementary_actions,
        frequency,
        effectiveness: effectiveness(frequency),
    }
}
