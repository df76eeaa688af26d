//! Ranking knobs loaded from TOML (`config/ranking.toml` or `RANKER_CONFIG_PATH`).
//!
//! Every field has a built-in default, so a partial file (or no file at all)
//! yields the stock engine behaviour:
//!
//! ```toml
//! [base]
//! prior = 0.5
//! emergency_prior = 0.9
//! history_step = 0.05
//! history_cap = 0.2
//!
//! [categories]
//! crisis = 0.9
//! wellness = 0.7
//! tracking = 0.6
//! therapy = 0.7
//! social = 0.5
//! professional = 0.6
//!
//! [rules]
//! threshold = 0.5
//! boost_factor = 0.3
//! ```

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::warn;

use crate::action::Category;

pub const DEFAULT_RANKER_CONFIG_PATH: &str = "config/ranking.toml";
pub const ENV_RANKER_CONFIG_PATH: &str = "RANKER_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub base: BaseWeights,
    #[serde(default)]
    pub categories: CategoryWeights,
    #[serde(default)]
    pub rules: RuleWeights,
}

/// Prior used by the base scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseWeights {
    pub prior: f32,
    pub emergency_prior: f32,
    /// Boost per occurrence in the action history.
    pub history_step: f32,
    pub history_cap: f32,
}

impl Default for BaseWeights {
    fn default() -> Self {
        Self {
            prior: 0.5,
            emergency_prior: 0.9,
            history_step: 0.05,
            history_cap: 0.2,
        }
    }
}

/// Blended (averaged) into the running prior. `Category::Other` has no weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub crisis: f32,
    pub wellness: f32,
    pub tracking: f32,
    pub therapy: f32,
    pub social: f32,
    pub professional: f32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            crisis: 0.9,
            wellness: 0.7,
            tracking: 0.6,
            therapy: 0.7,
            social: 0.5,
            professional: 0.6,
        }
    }
}

impl CategoryWeights {
    pub fn weight_for(&self, category: Category) -> Option<f32> {
        match category {
            Category::Crisis => Some(self.crisis),
            Category::Wellness => Some(self.wellness),
            Category::Tracking => Some(self.tracking),
            Category::Therapy => Some(self.therapy),
            Category::Social => Some(self.social),
            Category::Professional => Some(self.professional),
            Category::Other => None,
        }
    }
}

/// How live rule values turn into boosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    /// A rule applies only when its value is strictly above this.
    pub threshold: f32,
    pub boost_factor: f32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            boost_factor: 0.3,
        }
    }
}

impl RankingConfig {
    /// Load from `RANKER_CONFIG_PATH` or `config/ranking.toml`.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = config_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read ranking config at {}: {}",
                path.display(),
                e
            )
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: RankingConfig = toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("ranking config parse error: {e}"))?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Like `from_toml`, but never fails: falls back to defaults.
    pub fn load_or_default() -> Self {
        match Self::from_toml() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(target: "ranker", error = %e, "using built-in ranking config");
                Self::default()
            }
        }
    }

    /// Replace non-finite or negative values with defaults.
    fn sanitize(&mut self) {
        fn fix(v: &mut f32, d: f32) {
            if !v.is_finite() || *v < 0.0 {
                *v = d;
            }
        }
        let b = BaseWeights::default();
        fix(&mut self.base.prior, b.prior);
        fix(&mut self.base.emergency_prior, b.emergency_prior);
        fix(&mut self.base.history_step, b.history_step);
        fix(&mut self.base.history_cap, b.history_cap);

        let c = CategoryWeights::default();
        fix(&mut self.categories.crisis, c.crisis);
        fix(&mut self.categories.wellness, c.wellness);
        fix(&mut self.categories.tracking, c.tracking);
        fix(&mut self.categories.therapy, c.therapy);
        fix(&mut self.categories.social, c.social);
        fix(&mut self.categories.professional, c.professional);

        let r = RuleWeights::default();
        fix(&mut self.rules.threshold, r.threshold);
        fix(&mut self.rules.boost_factor, r.boost_factor);
    }
}

pub fn config_path() -> PathBuf {
    std::env::var(ENV_RANKER_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_RANKER_CONFIG_PATH))
}
