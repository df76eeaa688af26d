//! Contextual rule registry.
//!
//! A rule is a pure function of the context (and, for `MedicationReminder`,
//! the wall-clock hour). It knows nothing about the catalog. Which actions a
//! rule applies to is decided by its static keyword set:
//! - a keyword matches when it equals the action's `icon`, or
//! - it is a case-insensitive substring of the action's `label`.
//!
//! Each rule carries one fixed reason string shown to the user when it fires.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::clock::Clock;
use crate::context::{ContextModel, TimeOfDay};

/// Hours at which medication reminders are relevant.
pub const MEDICATION_HOURS: [u32; 4] = [8, 12, 18, 22];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    MorningMeditation,
    EveningJournal,
    CrisisLowMood,
    BreathingAnxiety,
    MedicationReminder,
    SocialIsolation,
    SleepHygiene,
    IndoorActivities,
    StressRelief,
}

impl RuleId {
    pub const ALL: [RuleId; 9] = [
        RuleId::MorningMeditation,
        RuleId::EveningJournal,
        RuleId::CrisisLowMood,
        RuleId::BreathingAnxiety,
        RuleId::MedicationReminder,
        RuleId::SocialIsolation,
        RuleId::SleepHygiene,
        RuleId::IndoorActivities,
        RuleId::StressRelief,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleId::MorningMeditation => "morning_meditation",
            RuleId::EveningJournal => "evening_journal",
            RuleId::CrisisLowMood => "crisis_low_mood",
            RuleId::BreathingAnxiety => "breathing_anxiety",
            RuleId::MedicationReminder => "medication_reminder",
            RuleId::SocialIsolation => "social_isolation",
            RuleId::SleepHygiene => "sleep_hygiene",
            RuleId::IndoorActivities => "indoor_activities",
            RuleId::StressRelief => "stress_relief",
        }
    }

    /// Live relevance of this rule for `ctx`.
    pub fn evaluate(self, ctx: &ContextModel, clock: &dyn Clock) -> f32 {
        match self {
            RuleId::MorningMeditation => {
                if ctx.is_time(TimeOfDay::Morning) {
                    0.8
                } else {
                    0.2
                }
            }
            RuleId::EveningJournal => match ctx.time_of_day {
                Some(TimeOfDay::Evening) => 0.9,
                Some(TimeOfDay::Night) => 0.7,
                _ => 0.3,
            },
            RuleId::CrisisLowMood => {
                if ctx.mood_score() < 3 {
                    1.0
                } else {
                    0.1
                }
            }
            RuleId::BreathingAnxiety => {
                if ctx.mood_mentions("anxious") || ctx.mood_mentions("stressed") {
                    0.9
                } else {
                    0.4
                }
            }
            RuleId::MedicationReminder => {
                if MEDICATION_HOURS.contains(&clock.hour()) {
                    0.8
                } else {
                    0.2
                }
            }
            RuleId::SocialIsolation => {
                if below(ctx.social_interaction, 3.0) {
                    0.7
                } else {
                    0.3
                }
            }
            RuleId::SleepHygiene => {
                if ctx.is_time(TimeOfDay::Night) && below(ctx.sleep_quality, 5.0) {
                    0.8
                } else {
                    0.2
                }
            }
            RuleId::IndoorActivities => {
                if ctx
                    .weather_condition
                    .is_some_and(|w| w.keeps_people_indoors())
                {
                    0.7
                } else {
                    0.4
                }
            }
            RuleId::StressRelief => {
                if above(ctx.stress_level, 7.0) {
                    0.9
                } else {
                    0.3
                }
            }
        }
    }

    /// Action tags this rule applies to.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            RuleId::MorningMeditation => &["meditation", "mindfulness"],
            RuleId::EveningJournal => &["journal", "reflection", "gratitude"],
            RuleId::CrisisLowMood => &["emergency", "crisis", "hotline", "support"],
            RuleId::BreathingAnxiety => &["breathe", "breathing", "grounding"],
            RuleId::MedicationReminder => &["medication", "pill"],
            RuleId::SocialIsolation => &["social", "friend", "connect", "message"],
            RuleId::SleepHygiene => &["sleep", "bedtime", "wind-down"],
            RuleId::IndoorActivities => &["music", "reading", "journal", "meditation"],
            RuleId::StressRelief => &["breathe", "meditation", "music", "grounding", "stretch"],
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            RuleId::MorningMeditation => "Start your day mindfully",
            RuleId::EveningJournal => "Reflect on your day",
            RuleId::CrisisLowMood => "Support is available right now",
            RuleId::BreathingAnxiety => "Slow breathing can calm anxiety",
            RuleId::MedicationReminder => "Time for your medication",
            RuleId::SocialIsolation => "Reach out to someone",
            RuleId::SleepHygiene => "Prepare for restful sleep",
            RuleId::IndoorActivities => "Good indoor activity",
            RuleId::StressRelief => "Helps release stress",
        }
    }

    pub fn applies_to(self, action: &Action) -> bool {
        self.keywords().iter().any(|k| action.matches_keyword(k))
    }
}

fn below(v: Option<f32>, limit: f32) -> bool {
    v.is_some_and(|x| x < limit)
}

fn above(v: Option<f32>, limit: f32) -> bool {
    v.is_some_and(|x| x > limit)
}

/// Live value of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleValue {
    pub rule: RuleId,
    pub value: f32,
}

/// Ordered set of rules consulted by the booster.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRegistry {
    rules: Vec<RuleId>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self {
            rules: RuleId::ALL.to_vec(),
        }
    }
}

impl RuleRegistry {
    pub fn with_rules(rules: impl IntoIterator<Item = RuleId>) -> Self {
        let mut out: Vec<RuleId> = Vec::new();
        for r in rules {
            if !out.contains(&r) {
                out.push(r);
            }
        }
        Self { rules: out }
    }

    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Values for every registered rule, in registry order.
    pub fn evaluate_all(&self, ctx: &ContextModel, clock: &dyn Clock) -> Vec<RuleValue> {
        self.rules
            .iter()
            .map(|&rule| RuleValue {
                rule,
                value: rule.evaluate(ctx, clock),
            })
            .collect()
    }

    /// Rules whose value is strictly above `threshold`.
    pub fn active(&self, ctx: &ContextModel, clock: &dyn Clock, threshold: f32) -> Vec<RuleValue> {
        self.evaluate_all(ctx, clock)
            .into_iter()
            .filter(|rv| rv.value > threshold)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::context::Weather;

    const NOON: FixedClock = FixedClock(12);
    const TEN: FixedClock = FixedClock(10);

    fn ctx() -> ContextModel {
        ContextModel::new("u1")
    }

    #[test]
    fn time_rules() {
        let morning = ContextModel {
            time_of_day: Some(TimeOfDay::Morning),
            ..ctx()
        };
        let night = ContextModel {
            time_of_day: Some(TimeOfDay::Night),
            ..ctx()
        };
        assert_eq!(RuleId::MorningMeditation.evaluate(&morning, &TEN), 0.8);
        assert_eq!(RuleId::MorningMeditation.evaluate(&night, &TEN), 0.2);
        assert_eq!(RuleId::EveningJournal.evaluate(&night, &TEN), 0.7);
        assert_eq!(RuleId::EveningJournal.evaluate(&morning, &TEN), 0.3);
    }

    #[test]
    fn mood_rules() {
        let very_bad = ContextModel {
            current_mood: Some("very_bad".into()),
            ..ctx()
        };
        let low = ContextModel {
            current_mood: Some("low".into()),
            ..ctx()
        };
        let anxious = ContextModel {
            current_mood: Some("Feeling ANXIOUS".into()),
            ..ctx()
        };
        assert_eq!(RuleId::CrisisLowMood.evaluate(&very_bad, &TEN), 1.0);
        assert_eq!(RuleId::CrisisLowMood.evaluate(&low, &TEN), 0.1);
        assert_eq!(RuleId::BreathingAnxiety.evaluate(&anxious, &TEN), 0.9);
        assert_eq!(RuleId::BreathingAnxiety.evaluate(&low, &TEN), 0.4);
    }

    #[test]
    fn medication_hours_are_exact() {
        for h in 0..24 {
            let v = RuleId::MedicationReminder.evaluate(&ctx(), &FixedClock(h));
            let want = if MEDICATION_HOURS.contains(&h) { 0.8 } else { 0.2 };
            assert_eq!(v, want, "hour {h}");
        }
        assert_eq!(RuleId::MedicationReminder.evaluate(&ctx(), &NOON), 0.8);
    }

    #[test]
    fn missing_signals_never_trigger() {
        let c = ctx();
        assert_eq!(RuleId::SocialIsolation.evaluate(&c, &TEN), 0.3);
        assert_eq!(RuleId::StressRelief.evaluate(&c, &TEN), 0.3);
        assert_eq!(RuleId::IndoorActivities.evaluate(&c, &TEN), 0.4);
        let night = ContextModel {
            time_of_day: Some(TimeOfDay::Night),
            ..c
        };
        assert_eq!(RuleId::SleepHygiene.evaluate(&night, &TEN), 0.2);
    }

    #[test]
    fn signal_rules() {
        let c = ContextModel {
            time_of_day: Some(TimeOfDay::Night),
            sleep_quality: Some(3.0),
            social_interaction: Some(1.0),
            stress_level: Some(8.0),
            weather_condition: Some(Weather::Stormy),
            ..ctx()
        };
        assert_eq!(RuleId::SleepHygiene.evaluate(&c, &TEN), 0.8);
        assert_eq!(RuleId::SocialIsolation.evaluate(&c, &TEN), 0.7);
        assert_eq!(RuleId::StressRelief.evaluate(&c, &TEN), 0.9);
        assert_eq!(RuleId::IndoorActivities.evaluate(&c, &TEN), 0.7);

        // boundary: 7 is not above 7
        let seven = ContextModel {
            stress_level: Some(7.0),
            ..ctx()
        };
        assert_eq!(RuleId::StressRelief.evaluate(&seven, &TEN), 0.3);
    }

    #[test]
    fn active_filters_strictly_above_threshold() {
        let reg = RuleRegistry::default();
        let active = reg.active(&ctx(), &TEN, 0.5);
        // neutral context at 10:00 fires nothing
        assert!(active.is_empty(), "{active:?}");

        let all = reg.evaluate_all(&ctx(), &TEN);
        assert_eq!(all.len(), 9);
        assert_eq!(all[0].rule, RuleId::MorningMeditation);
    }

    #[test]
    fn registry_dedups_rules() {
        let reg = RuleRegistry::with_rules([
            RuleId::StressRelief,
            RuleId::StressRelief,
            RuleId::SleepHygiene,
        ]);
        assert_eq!(reg.rules(), &[RuleId::StressRelief, RuleId::SleepHygiene]);
    }

    #[test]
    fn keyword_table_applies_by_icon_and_label() {
        let med = Action::new("m", "Quick session", "meditation");
        let labelled = Action::new("j", "Gratitude list", "pen");
        let shop = Action::new("s", "Browse store", "browse");
        assert!(RuleId::MorningMeditation.applies_to(&med));
        assert!(RuleId::EveningJournal.applies_to(&labelled));
        assert!(!RuleId::EveningJournal.applies_to(&shop));
        assert_eq!(
            serde_json::to_value(RuleId::CrisisLowMood).unwrap(),
            serde_json::json!(RuleId::CrisisLowMood.name())
        );
    }
}
