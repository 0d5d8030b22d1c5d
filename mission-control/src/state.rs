//! User-state normalization.
//!
//! The data layer hands us a loosely typed JSON payload that may be partial,
//! `null`, or simply wrong. [`normalize`] projects it onto a total,
//! strongly typed [`NormalizedUserState`] so the engine never has to
//! null-check. It cannot fail.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::types::PillarKey;

/// Score for one pillar. `score` is `None` when the payload carried the
/// pillar but no usable number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PillarScore {
    pub score: Option<f64>,
}

/// Check-in momentum counters.
///
/// Kept as the numbers the payload sent; only missing or non-numeric
/// values default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Momentum {
    pub check_ins: f64,
    pub streaks: f64,
}

/// Sanitized projection of a raw user-state payload.
///
/// Built fresh for every composition call and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUserState {
    pub is_authenticated: bool,
    pub has_any_data: bool,
    pub life_score: f64,
    pub pillars: BTreeMap<PillarKey, PillarScore>,
    pub momentum: Momentum,
    pub distress_signals: bool,
    pub last_action_at: Option<DateTime<Utc>>,
    pub today_completed: bool,
}

impl NormalizedUserState {
    /// Score for a pillar, if present and numeric.
    pub fn pillar_score(&self, pillar: PillarKey) -> Option<f64> {
        self.pillars.get(&pillar).and_then(|p| p.score)
    }
}

/// Normalize any payload into a total user state.
///
/// Each nested field is defaulted independently: `{"momentum": {"checkIns": 5}}`
/// yields `check_ins = 5.0, streaks = 0.0`.
pub fn normalize(raw: &Value) -> NormalizedUserState {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    NormalizedUserState {
        is_authenticated: read_bool(obj, "isAuthenticated"),
        has_any_data: read_bool(obj, "hasAnyData"),
        life_score: obj
            .get("lifeScore")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        pillars: read_pillars(obj.get("pillars")),
        momentum: read_momentum(obj.get("momentum")),
        distress_signals: read_bool(obj, "distressSignals"),
        last_action_at: obj.get("lastActionAt").and_then(read_timestamp),
        today_completed: read_bool(obj, "todayCompleted"),
    }
}

/// True only when the payload explicitly says `isAuthenticated: false`.
/// A missing flag does not count.
pub fn is_explicitly_unauthenticated(raw: &Value) -> bool {
    matches!(raw.get("isAuthenticated"), Some(Value::Bool(false)))
}

/// True only when the payload carries a numeric `lifeScore` equal to zero.
/// A missing score does not count.
pub fn has_zero_life_score(raw: &Value) -> bool {
    raw.get("lifeScore")
        .and_then(Value::as_f64)
        .is_some_and(|score| score == 0.0)
}

fn read_bool(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn read_pillars(value: Option<&Value>) -> BTreeMap<PillarKey, PillarScore> {
    let Some(Value::Object(entries)) = value else {
        return BTreeMap::new();
    };

    entries
        .iter()
        .filter_map(|(key, entry)| {
            let pillar = PillarKey::parse(key)?;
            let score = entry.get("score").and_then(Value::as_f64);
            Some((pillar, PillarScore { score }))
        })
        .collect()
}

fn read_momentum(value: Option<&Value>) -> Momentum {
    let Some(value) = value else {
        return Momentum::default();
    };

    Momentum {
        check_ins: read_count(value.get("checkIns")),
        streaks: read_count(value.get("streaks")),
    }
}

fn read_count(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Epoch millis or an RFC 3339 string.
fn read_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_non_object_inputs() {
        for raw in [Value::Null, json!(42), json!("state"), json!([1, 2, 3])] {
            let state = normalize(&raw);
            assert_eq!(state, NormalizedUserState::default());
        }
    }

    #[test]
    fn test_nested_defaults_are_independent() {
        let state = normalize(&json!({ "momentum": { "checkIns": 5 } }));
        assert_eq!(state.momentum.check_ins, 5.0);
        assert_eq!(state.momentum.streaks, 0.0);
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let state = normalize(&json!({
            "isAuthenticated": "yes",
            "hasAnyData": 1,
            "lifeScore": "high",
            "pillars": ["sleep"],
            "momentum": null,
            "distressSignals": null,
            "lastActionAt": { "when": "today" },
        }));

        assert!(!state.is_authenticated);
        assert!(!state.has_any_data);
        assert_eq!(state.life_score, 0.0);
        assert!(state.pillars.is_empty());
        assert_eq!(state.momentum, Momentum::default());
        assert!(!state.distress_signals);
        assert!(state.last_action_at.is_none());
    }

    #[test]
    fn test_pillars_parsing() {
        let state = normalize(&json!({
            "pillars": {
                "sleep": { "score": 42 },
                "social": { "score": "n/a" },
                "mental": 70,
                "hydration": { "score": 10 },
            }
        }));

        assert_eq!(state.pillar_score(PillarKey::Sleep), Some(42.0));
        assert!(state.pillars.contains_key(&PillarKey::Social));
        assert_eq!(state.pillar_score(PillarKey::Social), None);
        assert_eq!(state.pillar_score(PillarKey::Mental), None);
        assert_eq!(state.pillars.len(), 3);
    }

    #[test]
    fn test_counts_keep_their_magnitude() {
        let state = normalize(&json!({ "momentum": { "checkIns": 0.5, "streaks": 2.9 } }));
        assert_eq!(state.momentum.check_ins, 0.5);
        assert_eq!(state.momentum.streaks, 2.9);

        let state = normalize(&json!({ "momentum": { "checkIns": -3, "streaks": "many" } }));
        assert_eq!(state.momentum.check_ins, -3.0);
        assert_eq!(state.momentum.streaks, 0.0);
    }

    #[test]
    fn test_last_action_at_formats() {
        let millis = normalize(&json!({ "lastActionAt": 1_700_000_000_000_i64 }));
        assert_eq!(
            millis.last_action_at.map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );

        let rfc = normalize(&json!({ "lastActionAt": "2024-03-01T08:30:00+02:00" }));
        assert_eq!(
            rfc.last_action_at.map(|t| t.to_rfc3339()),
            Some("2024-03-01T06:30:00+00:00".to_string())
        );

        let null = normalize(&json!({ "lastActionAt": null }));
        assert!(null.last_action_at.is_none());
    }

    #[test]
    fn test_raw_flag_checks() {
        assert!(is_explicitly_unauthenticated(&json!({ "isAuthenticated": false })));
        assert!(!is_explicitly_unauthenticated(&json!({})));
        assert!(!is_explicitly_unauthenticated(&json!({ "isAuthenticated": null })));
        assert!(!is_explicitly_unauthenticated(&Value::Null));

        assert!(has_zero_life_score(&json!({ "lifeScore": 0 })));
        assert!(has_zero_life_score(&json!({ "lifeScore": 0.0 })));
        assert!(!has_zero_life_score(&json!({})));
        assert!(!has_zero_life_score(&json!({ "lifeScore": "0" })));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = json!({
            "isAuthenticated": true,
            "pillars": { "sleep": { "score": 55 } },
            "momentum": { "checkIns": 3, "streaks": 1 },
        });
        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
