//! Context booster: lifts the base prior using live context and active rules,
//! recording one reason per positive contribution.
//!
//! Order of application:
//! 1) time-of-day routines (morning / evening)
//! 2) mood (low mood, anxiety)
//! 3) sequential complementarity (after exercise / after therapy)
//! 4) active rules whose keywords match the action
//! 5) stress and sleep signals
//!
//! Reasons keep insertion order and are not de-duplicated.


use crate::action::Action;
use crate::clock::Clock;
use crate::config::RankingConfig;
use crate::context::{ContextModel, TimeOfDay};
use crate::rules::{RuleRegistry, RuleValue};
use crate::scoring::base_score;

pub const MAX_SCORE: f32 = 1.0;

const MORNING_ICONS: &[&str] = &["meditation", "mood", "medication"];
const EVENING_ICONS: &[&str] = &["journal", "breathe", "sleep"];
const LOW_MOOD_ICONS: &[&str] = &["emergency", "crisis", "grounding", "breathe"];
const ANXIETY_ICONS: &[&str] = &["breathe", "meditation", "grounding", "music"];
const STRESS_ICONS: &[&str] = &["breathe", "meditation", "music", "grounding"];
const SLEEP_ICONS: &[&str] = &["sleep", "meditation", "breathe"];

/// Scored action for the duration of one ranking call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionScore<'a> {
    pub action: &'a Action,
    pub score: f32,
    pub reasons: Vec<String>,
}

impl<'a> ActionScore<'a> {
    fn new(action: &'a Action, score: f32) -> Self {
        Self {
            action,
            score,
            reasons: Vec::new(),
        }
    }

    fn add(&mut self, delta: f32, reason: impl Into<String>) {
        self.score += delta;
        self.reasons.push(reason.into());
    }
}

/// Apply heuristics and pre-evaluated `active` rules on top of `base`.
pub fn boost<'a>(
    action: &'a Action,
    base: f32,
    ctx: &ContextModel,
    active: &[RuleValue],
    cfg: &RankingConfig,
) -> ActionScore<'a> {
    let mut s = ActionScore::new(action, base);
    let mood = ctx.mood_score();

    if ctx.is_time(TimeOfDay::Morning) && action.icon_in(MORNING_ICONS) {
        s.add(0.2, "Recommended for morning routine");
    }
    if ctx.is_time(TimeOfDay::Evening) && action.icon_in(EVENING_ICONS) {
        s.add(0.2, "Good for evening wind-down");
    }

    if mood < 4 && action.icon_in(LOW_MOOD_ICONS) {
        s.add(0.3, "Helpful for current mood");
    }
    if ctx.mood_mentions("anxious") && action.icon_in(ANXIETY_ICONS) {
        s.add(0.25, "Can help with anxiety");
    }

    match ctx.last_activity() {
        Some("exercise") if action.icon == "meditation" => {
            s.add(0.15, "Great after exercise");
        }
        Some("therapy") if action.icon == "journal" => {
            s.add(0.15, "Process therapy insights");
        }
        _ => {}
    }

    for rv in active {
        if rv.rule.applies_to(action) {
            s.add(rv.value * cfg.rules.boost_factor, rv.rule.reason());
        }
    }

    if ctx.stress_level.is_some_and(|x| x > 6.0) && action.icon_in(STRESS_ICONS) {
        s.add(0.2, "Stress relief activity");
    }
    if ctx.sleep_quality.is_some_and(|x| x < 5.0)
        && ctx.is_time(TimeOfDay::Night)
        && action.icon_in(SLEEP_ICONS)
    {
        s.add(0.2, "May improve sleep");
    }

    s.score = s.score.min(MAX_SCORE);
    s
}

/// Score one action on its own: evaluates the registry, then base + boost.
///
/// `ranking::rank` evaluates the registry once per call and goes through
/// [`boost`] directly; this is the entry point for a single catalog entry.
pub fn score_action<'a>(
    action: &'a Action,
    ctx: &ContextModel,
    registry: &RuleRegistry,
    clock: &dyn Clock,
    cfg: &RankingConfig,
) -> ActionScore<'a> {
    let active = registry.active(ctx, clock, cfg.rules.threshold);
    boost(action, base_score(action, ctx, cfg), ctx, &active, cfg)
}
