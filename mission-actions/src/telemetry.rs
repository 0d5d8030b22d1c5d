//! In-memory action telemetry.
//!
//! Read-only observability over lifecycle events. Nothing here feeds back
//! into composition.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::SinkError;
use crate::event::{ActionLifecycleEvent, LifecycleStage, Outcome};
use crate::sink::EventSink;

/// Metadata key carrying handler duration on `completed` events.
pub const DURATION_META_KEY: &str = "durationMs";

/// Counters for one action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStats {
    pub invoked_count: u64,
    pub completed_count: u64,
    pub error_count: u64,
    /// Running mean over completions that reported a duration
    pub avg_duration_ms: f64,
    #[serde(skip)]
    duration_samples: u64,
}

impl ActionStats {
    fn observe_duration(&mut self, duration_ms: f64) {
        self.duration_samples += 1;
        self.avg_duration_ms += (duration_ms - self.avg_duration_ms) / self.duration_samples as f64;
    }
}

/// Per-action counters built from lifecycle events.
#[derive(Default)]
pub struct TelemetryAggregator {
    stats: DashMap<String, ActionStats>,
}

impl TelemetryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the counters. Stages other than `invoked` and
    /// `completed` are ignored.
    pub fn observe(&self, event: &ActionLifecycleEvent) {
        match event.stage() {
            LifecycleStage::Invoked => {
                self.stats
                    .entry(event.action_id().to_string())
                    .or_default()
                    .invoked_count += 1;
            }
            LifecycleStage::Completed => {
                let mut stats = self.stats.entry(event.action_id().to_string()).or_default();
                stats.completed_count += 1;
                if event.outcome() == Some(Outcome::Error) {
                    stats.error_count += 1;
                }
                if let Some(duration) = event.meta_value(DURATION_META_KEY).and_then(Value::as_f64) {
                    stats.observe_duration(duration);
                }
            }
            _ => {}
        }
    }

    /// Counters for one action.
    pub fn stats(&self, action_id: &str) -> Option<ActionStats> {
        self.stats.get(action_id).map(|s| *s)
    }

    /// All counters, sorted by action id.
    pub fn snapshot(&self) -> BTreeMap<String, ActionStats> {
        self.stats
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn reset(&self) {
        self.stats.clear();
    }
}

#[async_trait]
impl EventSink for TelemetryAggregator {
    async fn append(&self, event: &ActionLifecycleEvent) -> Result<(), SinkError> {
        self.observe(event);
        Ok(())
    }
}
