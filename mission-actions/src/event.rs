//! Action lifecycle events.
//!
//! Append-only records of the stages an action goes through. Events are
//! built once and only ever handed out by shared reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Stage of an action's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    /// About to run the handler
    Invoked,
    /// Handler settled
    Completed,
    /// Surfaced to the user
    Shown,
    /// User engaged with it
    Acted,
    /// User postponed it
    Deferred,
    /// User dismissed it
    Dismissed,
}

/// How a handler settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
}

/// One lifecycle record. `ts` is epoch millis and establishes ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ActionLifecycleEvent {
    #[serde(rename = "type")]
    stage: LifecycleStage,
    action_id: String,
    ts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "typescript", ts(type = "Record<string, unknown> | null"))]
    meta: Option<Map<String, Value>>,
}

impl ActionLifecycleEvent {
    /// Create an event stamped with the current time.
    pub fn new(stage: LifecycleStage, action_id: impl Into<String>) -> Self {
        Self {
            stage,
            action_id: action_id.into(),
            ts: Utc::now().timestamp_millis(),
            outcome: None,
            meta: None,
        }
    }

    pub fn invoked(action_id: impl Into<String>) -> Self {
        Self::new(LifecycleStage::Invoked, action_id)
    }

    pub fn completed(action_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            outcome: Some(outcome),
            ..Self::new(LifecycleStage::Completed, action_id)
        }
    }

    /// Attach a metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, ts: DateTime<Utc>) -> Self {
        self.ts = ts.timestamp_millis();
        self
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn ts(&self) -> i64 {
        self.ts
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref()
    }

    /// Look up one metadata value.
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.as_ref().and_then(|m| m.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let event = ActionLifecycleEvent::completed("log-check-in", Outcome::Error)
            .with_meta("durationMs", 12);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "completed");
        assert_eq!(json["actionId"], "log-check-in");
        assert_eq!(json["outcome"], "error");
        assert_eq!(json["meta"]["durationMs"], 12);
        assert!(json["ts"].is_i64());
    }

    #[test]
    fn test_invoked_has_no_outcome_or_meta() {
        let event = ActionLifecycleEvent::invoked("open-ai-coach");
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("outcome").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_parse_from_log_line() {
        let line = r#"{"type":"dismissed","actionId":"read-insight","ts":1700000000000}"#;
        let event: ActionLifecycleEvent = serde_json::from_str(line).unwrap();
        assert_eq!(event.stage(), LifecycleStage::Dismissed);
        assert_eq!(event.ts(), 1_700_000_000_000);
        assert!(event.meta().is_none());
    }
}
