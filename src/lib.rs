// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod action;
pub mod clock;
pub mod config;
pub mod context;
pub mod insights;
pub mod rules;

// Pipeline stages: base scorer -> booster -> aggregator
pub mod booster;
pub mod ranking;
pub mod scoring;

pub mod engine;

// HTTP preview surface, metrics and logging
pub mod api;
pub mod metrics;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::action::{Action, Category};
pub use crate::api::router;
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::RankingConfig;
pub use crate::context::{mood_score, ContextModel, ContextPatch, TimeOfDay, Weather};
pub use crate::engine::ActionRanker;
pub use crate::insights::ActionInsights;
pub use crate::ranking::{RankedAction, DEFAULT_LIMIT};
pub use crate::rules::{RuleId, RuleRegistry};
