//! # Ranking Engine
//! Per-session facade over the pipeline:
//! context + catalog → base scorer → booster → aggregator.
//!
//! The engine holds one context snapshot between calls. `update_context` and
//! `record_action` swap in a new snapshot; nothing is edited in place. There
//! is no internal locking: give every session its own `ActionRanker`.

use std::sync::Arc;
use tracing::debug;

use crate::action::Action;
use crate::booster;
use crate::clock::{Clock, SystemClock};
use crate::config::RankingConfig;
use crate::context::{ContextModel, ContextPatch};
use crate::insights::{self, ActionInsights};
use crate::ranking::{self, RankedAction, DEFAULT_LIMIT};
use crate::rules::{RuleRegistry, RuleValue};
use crate::telemetry::{anon_hash, truncate_vec};

#[derive(Clone)]
pub struct ActionRanker {
    context: ContextModel,
    registry: RuleRegistry,
    clock: Arc<dyn Clock>,
    config: RankingConfig,
}

impl ActionRanker {
    /// All rules, system clock, built-in config.
    pub fn new(context: ContextModel) -> Self {
        Self {
            context,
            registry: RuleRegistry::default(),
            clock: Arc::new(SystemClock),
            config: RankingConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: RankingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn context(&self) -> &ContextModel {
        &self.context
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Replace the held snapshot with `old + patch`.
    pub fn update_context(&mut self, patch: ContextPatch) {
        self.context = self.context.merged(patch);
    }

    /// Replace the held snapshot with one that records `action_id` as chosen.
    pub fn record_action(&mut self, action_id: &str) {
        self.context = self.context.with_recorded_action(action_id);
    }

    pub fn rank(&self, actions: &[Action], limit: usize) -> Vec<RankedAction> {
        let out = ranking::rank(
            actions,
            limit,
            &self.context,
            &self.registry,
            self.clock.as_ref(),
            &self.config,
        );

        let top: Vec<&str> = out.iter().map(|r| r.action.id.as_str()).collect();
        debug!(
            target: "ranker",
            user = %anon_hash(&self.context.user_id),
            candidates = actions.len(),
            limit,
            returned = out.len(),
            top = ?truncate_vec(&top, 5),
            "ranked actions"
        );
        out
    }

    pub fn rank_default(&self, actions: &[Action]) -> Vec<RankedAction> {
        self.rank(actions, DEFAULT_LIMIT)
    }

    /// Score a single action against the held snapshot, without ranking.
    pub fn score(&self, action: &Action) -> RankedAction {
        booster::score_action(
            action,
            &self.context,
            &self.registry,
            self.clock.as_ref(),
            &self.config,
        )
        .into()
    }

    pub fn insights(&self, action_id: &str) -> ActionInsights {
        insights::insights(action_id, &self.context)
    }

    /// Live value of every registered rule for the held snapshot.
    pub fn rule_values(&self) -> Vec<RuleValue> {
        self.registry
            .evaluate_all(&self.context, self.clock.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::context::TimeOfDay;
    use crate::rules::RuleId;

    fn ranker(ctx: ContextModel) -> ActionRanker {
        ActionRanker::new(ctx).with_clock(Arc::new(FixedClock(10)))
    }

    #[test]
    fn update_context_swaps_snapshot() {
        let mut r = ranker(ContextModel::new("u"));
        let before = r.context().clone();
        r.update_context(ContextPatch {
            time_of_day: Some(TimeOfDay::Evening),
            ..Default::default()
        });
        assert_eq!(before.time_of_day, None);
        assert_eq!(r.context().time_of_day, Some(TimeOfDay::Evening));
    }

    #[test]
    fn record_action_feeds_history_and_insights() {
        let mut r = ranker(ContextModel::new("u"));
        r.record_action("journal");
        r.record_action("journal");
        let i = r.insights("journal");
        assert_eq!(i.frequency, 2);
        assert_eq!(r.context().last_activity(), Some("journal"));
    }

    #[test]
    fn rank_default_caps_at_five() {
        let r = ranker(ContextModel::new("u"));
        let catalog: Vec<Action> = (0..8)
            .map(|i| Action::new(format!("a{i}"), format!("A{i}"), "x"))
            .collect();
        assert_eq!(r.rank_default(&catalog).len(), 5);
    }

    #[test]
    fn single_score_matches_ranked_entry() {
        let ctx = ContextModel {
            time_of_day: Some(TimeOfDay::Morning),
            ..ContextModel::new("u")
        };
        let r = ranker(ctx);
        let pill = Action::new("pill", "Take medication", "medication");
        let catalog = [Action::new("shop", "Shop", "browse"), pill.clone()];
        let ranked = r.rank(&catalog, 2);
        let alone = r.score(&pill);
        assert_eq!(ranked[0], alone);
        assert!(alone.reasons.contains(&"Recommended for morning routine".to_string()));
    }

    #[test]
    fn restricted_registry_ignores_other_rules() {
        let ctx = ContextModel {
            time_of_day: Some(TimeOfDay::Morning),
            ..ContextModel::new("u")
        };
        let r = ranker(ctx).with_registry(RuleRegistry::with_rules([RuleId::StressRelief]));
        let out = r.rank(&[Action::new("m", "Sit", "meditation")], 1);
        assert_eq!(out[0].reasons, vec!["Recommended for morning routine"]);
        assert_eq!(r.rule_values().len(), 1);
    }
}
