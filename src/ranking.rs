//! Ranking aggregator: score every catalog entry, sort, truncate, annotate.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::action::Action;
use crate::booster::{boost, ActionScore};
use crate::clock::Clock;
use crate::config::RankingConfig;
use crate::context::ContextModel;
use crate::rules::RuleRegistry;
use crate::scoring::base_score;

pub const DEFAULT_LIMIT: usize = 5;

/// Catalog entry annotated for display. Serializes flat:
/// `{ id, label, icon, category, is_emergency, score, reasons }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAction {
    #[serde(flatten)]
    pub action: Action,
    pub score: f32,
    pub reasons: Vec<String>,
}

impl From<ActionScore<'_>> for RankedAction {
    fn from(s: ActionScore<'_>) -> Self {
        Self {
            action: s.action.clone(),
            score: s.score,
            reasons: s.reasons,
        }
    }
}

/// Rank `actions` for `ctx`, best first. Ties keep catalog order.
pub fn rank(
    actions: &[Action],
    limit: usize,
    ctx: &ContextModel,
    registry: &RuleRegistry,
    clock: &dyn Clock,
    cfg: &RankingConfig,
) -> Vec<RankedAction> {
    if actions.is_empty() || limit == 0 {
        return Vec::new();
    }

    // Rule values depend only on the context: evaluate once per call.
    let active = registry.active(ctx, clock, cfg.rules.threshold);

    let mut scored: Vec<ActionScore<'_>> = actions
        .iter()
        .map(|a| boost(a, base_score(a, ctx, cfg), ctx, &active, cfg))
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(limit);

    scored.into_iter().map(RankedAction::from).collect()
}
