//! Base scorer: context-independent prior for an action.
//!
//! prior     = 0.5, or 0.9 for emergency/crisis actions (override)
//! familiar  = + min(0.2, 0.05 * times chosen before)
//! category  = average(running, category weight) when the category has one
//!
//! Result is not clamped here; the booster clamps the final score.

use crate::action::Action;
use crate::config::RankingConfig;
use crate::context::ContextModel;

/// Capped familiarity bonus for an action picked `frequency` times.
pub fn history_boost(frequency: usize, cfg: &RankingConfig) -> f32 {
    (frequency as f32 * cfg.base.history_step).min(cfg.base.history_cap)
}

pub fn base_score(action: &Action, ctx: &ContextModel, cfg: &RankingConfig) -> f32 {
    let mut score = if action.is_crisis() {
        cfg.base.emergency_prior
    } else {
        cfg.base.prior
    };

    let frequency = ctx.frequency_of(&action.id);
    if frequency > 0 {
        score += history_boost(frequency, cfg);
    }

    if let Some(w) = action.category.and_then(|c| cfg.categories.weight_for(c)) {
        score = (score + w) / 2.0;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Category;

    fn cfg() -> RankingConfig {
        RankingConfig::default()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn neutral_action_starts_at_half() {
        let a = Action::new("x", "Browse", "browse");
        assert!(approx(base_score(&a, &ContextModel::new("u"), &cfg()), 0.5));
    }

    #[test]
    fn emergency_overrides_prior() {
        let a = Action::new("call-988", "Call 988", "emergency").emergency();
        assert!(approx(base_score(&a, &ContextModel::new("u"), &cfg()), 0.9));

        // crisis category: 0.9 blended with 0.9
        let c = Action::new("c", "Crisis line", "phone").category(Category::Crisis);
        assert!(approx(base_score(&c, &ContextModel::new("u"), &cfg()), 0.9));
    }

    #[test]
    fn history_boost_is_capped() {
        let a = Action::new("breathe", "Breathe", "breathe");
        let ctx = ContextModel {
            action_history: vec!["breathe".to_string(); 10],
            ..ContextModel::new("u")
        };
        assert!(approx(history_boost(10, &cfg()), 0.2));
        assert!(approx(base_score(&a, &ctx, &cfg()), 0.7));

        assert!(approx(history_boost(2, &cfg()), 0.1));
        assert!(approx(history_boost(0, &cfg()), 0.0));
    }

    #[test]
    fn category_is_averaged_not_added() {
        let a = Action::new("w", "Walk", "walk").category(Category::Wellness);
        // (0.5 + 0.7) / 2
        assert!(approx(base_score(&a, &ContextModel::new("u"), &cfg()), 0.6));

        let other = Action::new("o", "Other", "o").category(Category::Other);
        assert!(approx(base_score(&other, &ContextModel::new("u"), &cfg()), 0.5));
    }

    #[test]
    fn history_then_category() {
        let a = Action::new("mood", "Log mood", "mood").category(Category::Tracking);
        let ctx = ContextModel {
            action_history: vec!["mood".into(), "x".into(), "mood".into()],
            ..ContextModel::new("u")
        };
        // (0.5 + 0.1 + 0.6) / 2
        assert!(approx(base_score(&a, &ctx, &cfg()), 0.6));
    }
}
