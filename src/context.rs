//! # Context Model
//! Immutable "why now" snapshot fed into every ranking call, plus the fixed
//! mood-label lookup used by numeric comparisons.
//!
//! Snapshots are never edited in place: `merged`, `with_recorded_action` and
//! `with_inferred_time_of_day` all return a fresh copy.

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::clock::Clock;

/// Mood score used when the label is absent or not in the table.
pub const NEUTRAL_MOOD: u8 = 5;

/// Coarse part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket a 0..=23 wall-clock hour.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// Case-insensitive label lookup.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(TimeOfDay::Morning),
            "afternoon" => Some(TimeOfDay::Afternoon),
            "evening" => Some(TimeOfDay::Evening),
            "night" => Some(TimeOfDay::Night),
            _ => None,
        }
    }
}

/// Weather signal. Unknown labels deserialize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    #[serde(other)]
    Other,
}

impl Weather {
    /// Case-insensitive; unknown labels are `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sunny" => Weather::Sunny,
            "cloudy" => Weather::Cloudy,
            "rainy" => Weather::Rainy,
            "stormy" => Weather::Stormy,
            "snowy" => Weather::Snowy,
            _ => Weather::Other,
        }
    }

    pub fn keeps_people_indoors(self) -> bool {
        matches!(self, Weather::Rainy | Weather::Stormy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Snapshot of the user's situation at ranking time.
///
/// Numeric signals are on a 0..=10 scale. A missing signal never satisfies a
/// threshold comparison.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextModel {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mood: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_time_of_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Most recent last.
    #[serde(default)]
    pub recent_activity: Vec<String>,
    /// Previously chosen action ids, repeats allowed.
    #[serde(default)]
    pub action_history: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_weather",
        skip_serializing_if = "Option::is_none"
    )]
    pub weather_condition: Option<Weather>,
    #[serde(
        default,
        deserialize_with = "lenient_weekday",
        skip_serializing_if = "Option::is_none"
    )]
    pub day_of_week: Option<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_interaction: Option<f32>,
}

/// Partial update; `Some` fields overwrite, `None` fields keep the old value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContextPatch {
    pub user_id: Option<String>,
    pub current_mood: Option<String>,
    #[serde(default, deserialize_with = "lenient_time_of_day")]
    pub time_of_day: Option<TimeOfDay>,
    pub location: Option<Location>,
    pub recent_activity: Option<Vec<String>>,
    pub action_history: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_weather")]
    pub weather_condition: Option<Weather>,
    #[serde(default, deserialize_with = "lenient_weekday")]
    pub day_of_week: Option<Weekday>,
    pub stress_level: Option<f32>,
    pub sleep_quality: Option<f32>,
    pub social_interaction: Option<f32>,
}

// Categorical signals never fail a request. Non-string values become `None`,
// unknown strings become `None` too, except weather which maps them to `Other`.

fn lenient_label<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.and_then(|v| v.as_str().map(str::to_owned)))
}

fn lenient_time_of_day<'de, D>(d: D) -> Result<Option<TimeOfDay>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_label(d)?.and_then(|s| TimeOfDay::parse(&s)))
}

fn lenient_weather<'de, D>(d: D) -> Result<Option<Weather>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_label(d)?.map(|s| Weather::parse(&s)))
}

fn lenient_weekday<'de, D>(d: D) -> Result<Option<Weekday>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_label(d)?.and_then(|s| s.trim().parse::<Weekday>().ok()))
}

impl ContextModel {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn mood_score(&self) -> u8 {
        mood_score(self.current_mood.as_deref())
    }

    /// Case-insensitive substring check on the raw mood label.
    pub fn mood_mentions(&self, needle: &str) -> bool {
        self.current_mood
            .as_deref()
            .is_some_and(|m| m.to_lowercase().contains(needle))
    }

    pub fn is_time(&self, t: TimeOfDay) -> bool {
        self.time_of_day == Some(t)
    }

    pub fn last_activity(&self) -> Option<&str> {
        self.recent_activity.last().map(String::as_str)
    }

    /// How many times `action_id` appears in the history.
    pub fn frequency_of(&self, action_id: &str) -> usize {
        self.action_history
            .iter()
            .filter(|id| id.as_str() == action_id)
            .count()
    }

    /// New snapshot = this snapshot + patch.
    pub fn merged(&self, patch: ContextPatch) -> Self {
        let base = self.clone();
        Self {
            user_id: patch.user_id.unwrap_or(base.user_id),
            current_mood: patch.current_mood.or(base.current_mood),
            time_of_day: patch.time_of_day.or(base.time_of_day),
            location: patch.location.or(base.location),
            recent_activity: patch.recent_activity.unwrap_or(base.recent_activity),
            action_history: patch.action_history.unwrap_or(base.action_history),
            weather_condition: patch.weather_condition.or(base.weather_condition),
            day_of_week: patch.day_of_week.or(base.day_of_week),
            stress_level: patch.stress_level.or(base.stress_level),
            sleep_quality: patch.sleep_quality.or(base.sleep_quality),
            social_interaction: patch.social_interaction.or(base.social_interaction),
        }
    }

    /// New snapshot with `action_id` appended to both recent activity and history.
    pub fn with_recorded_action(&self, action_id: impl Into<String>) -> Self {
        let id = action_id.into();
        let mut next = self.clone();
        next.recent_activity.push(id.clone());
        next.action_history.push(id);
        next
    }

    /// Fill `time_of_day` from the clock, only when the caller left it empty.
    pub fn with_inferred_time_of_day(&self, clock: &dyn Clock) -> Self {
        let mut next = self.clone();
        if next.time_of_day.is_none() {
            next.time_of_day = Some(TimeOfDay::from_hour(clock.hour()));
        }
        next
    }
}

/// Map a mood label to 1..=9. Exact, case-insensitive; anything else is neutral.
pub fn mood_score(label: Option<&str>) -> u8 {
    let Some(label) = label else {
        return NEUTRAL_MOOD;
    };
    match label.to_lowercase().as_str() {
        "very_bad" => 1,
        "bad" => 2,
        "low" => 3,
        "neutral" => 5,
        "okay" => 6,
        "good" => 7,
        "very_good" => 8,
        "excellent" => 9,
        _ => NEUTRAL_MOOD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn mood_table_is_total() {
        assert_eq!(mood_score(None), 5);
        assert_eq!(mood_score(Some("excellent")), 9);
        assert_eq!(mood_score(Some("VERY_BAD")), 1);
        assert_eq!(mood_score(Some("Low")), 3);
        assert_eq!(mood_score(Some("unknown_value")), 5);
        // exact match only
        assert_eq!(mood_score(Some("pretty good")), 5);
        assert_eq!(mood_score(Some("")), 5);
    }

    #[test]
    fn merge_produces_new_snapshot() {
        let old = ContextModel {
            current_mood: Some("low".into()),
            stress_level: Some(4.0),
            ..ContextModel::new("u1")
        };
        let patch = ContextPatch {
            stress_level: Some(9.0),
            time_of_day: Some(TimeOfDay::Night),
            ..Default::default()
        };
        let new = old.merged(patch);

        assert_eq!(old.stress_level, Some(4.0));
        assert_eq!(old.time_of_day, None);
        assert_eq!(new.stress_level, Some(9.0));
        assert_eq!(new.time_of_day, Some(TimeOfDay::Night));
        assert_eq!(new.current_mood.as_deref(), Some("low"));
        assert_eq!(new.user_id, "u1");
    }

    #[test]
    fn recorded_action_appends_to_both_lists() {
        let ctx = ContextModel::new("u1").with_recorded_action("breathe");
        let ctx = ctx.with_recorded_action("journal");
        assert_eq!(ctx.last_activity(), Some("journal"));
        assert_eq!(ctx.frequency_of("breathe"), 1);
        assert_eq!(ctx.action_history.len(), 2);
    }

    #[test]
    fn hour_buckets() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(3), TimeOfDay::Night);
    }

    #[test]
    fn inferred_time_never_overrides_caller() {
        let clock = FixedClock(9);
        let empty = ContextModel::new("u1").with_inferred_time_of_day(&clock);
        assert_eq!(empty.time_of_day, Some(TimeOfDay::Morning));

        let set = ContextModel {
            time_of_day: Some(TimeOfDay::Night),
            ..ContextModel::new("u1")
        }
        .with_inferred_time_of_day(&clock);
        assert_eq!(set.time_of_day, Some(TimeOfDay::Night));
    }

    #[test]
    fn malformed_categorical_signals_fall_back() {
        let ctx: ContextModel = serde_json::from_str(
            r#"{"user_id":"u1","time_of_day":"Morning","day_of_week":1,"weather_condition":"RAINY"}"#,
        )
        .unwrap();
        assert_eq!(ctx.time_of_day, Some(TimeOfDay::Morning));
        assert_eq!(ctx.day_of_week, None);
        assert_eq!(ctx.weather_condition, Some(Weather::Rainy));

        let ctx: ContextModel = serde_json::from_str(
            r#"{"user_id":"u1","time_of_day":"dusk","day_of_week":"someday","weather_condition":7}"#,
        )
        .unwrap();
        assert_eq!(ctx.time_of_day, None);
        assert_eq!(ctx.day_of_week, None);
        assert_eq!(ctx.weather_condition, None);

        let ctx: ContextModel =
            serde_json::from_str(r#"{"user_id":"u1","day_of_week":"Friday"}"#).unwrap();
        assert_eq!(ctx.day_of_week, Some(Weekday::Fri));

        let patch: ContextPatch =
            serde_json::from_str(r#"{"time_of_day":"NIGHT","day_of_week":null}"#).unwrap();
        assert_eq!(patch.time_of_day, Some(TimeOfDay::Night));
        assert_eq!(patch.day_of_week, None);
    }

    #[test]
    fn deserializes_sparse_json() {
        let ctx: ContextModel = serde_json::from_str(
            r#"{"user_id":"u9","current_mood":"anxious","weather_condition":"foggy","stress_level":8}"#,
        )
        .unwrap();
        assert_eq!(ctx.weather_condition, Some(Weather::Other));
        assert!(ctx.mood_mentions("anxious"));
        assert_eq!(ctx.mood_score(), 5);
        assert!(ctx.recent_activity.is_empty());
    }
}
