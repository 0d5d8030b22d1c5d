//! User dashboard preferences and their (gated) persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::capability::CapabilityFlags;
use crate::error::MissionControlError;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Per-user dashboard preferences.
///
/// Reserved for personalization; the composition ladder does not read
/// these yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Module ids in the user's preferred order
    pub module_order: Vec<String>,
    /// Module ids the user has hidden
    pub hidden_modules: Vec<String>,
    /// Whether the pillar overview was left expanded
    pub pillar_overview_expanded: bool,
}

/// Storage backend for preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<Preferences>, MissionControlError>;

    async fn save(&self, user_id: &str, preferences: &Preferences)
        -> Result<(), MissionControlError>;
}

/// In-memory preference store.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    entries: Arc<RwLock<HashMap<String, Preferences>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self, user_id: &str) -> Result<Option<Preferences>, MissionControlError> {
        let entries = self.entries.read().await;
        Ok(entries.get(user_id).cloned())
    }

    async fn save(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<(), MissionControlError> {
        let mut entries = self.entries.write().await;
        entries.insert(user_id.to_string(), preferences.clone());
        Ok(())
    }
}

/// Result of a save through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Written to the store
    Saved,
    /// Personalisation persistence is switched off; nothing was written
    Disabled,
}

/// Capability-gated access to a [`PreferenceStore`].
pub struct PersonalisationGate {
    flags: CapabilityFlags,
    store: Arc<dyn PreferenceStore>,
}

impl PersonalisationGate {
    pub fn new(flags: CapabilityFlags, store: Arc<dyn PreferenceStore>) -> Self {
        Self { flags, store }
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.mc_personalisation_persistence_enabled
    }

    /// Load preferences. Disabled persistence, a missing entry, or a store
    /// failure all yield the defaults.
    pub async fn load(&self, user_id: &str) -> Preferences {
        if !self.is_enabled() {
            return Preferences::default();
        }

        match self.store.load(user_id).await {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(e) => {
                debug!(user_id = %user_id, error = %e, "Preference load failed");
                Preferences::default()
            }
        }
    }

    /// Save preferences when persistence is enabled.
    pub async fn save(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<PersistOutcome, MissionControlError> {
        if !self.is_enabled() {
            return Ok(PersistOutcome::Disabled);
        }

        self.store.save(user_id, preferences).await?;
        Ok(PersistOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences {
        Preferences {
            module_order: vec!["momentum".to_string()],
            hidden_modules: vec!["narrative-insight".to_string()],
            pillar_overview_expanded: true,
        }
    }

    #[tokio::test]
    async fn test_disabled_gate_writes_nothing() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let gate = PersonalisationGate::new(CapabilityFlags::default(), store.clone());

        let outcome = gate.save("user-1", &prefs()).await.unwrap();
        assert_eq!(outcome, PersistOutcome::Disabled);
        assert!(store.load("user-1").await.unwrap().is_none());
        assert_eq!(gate.load("user-1").await, Preferences::default());
    }

    #[tokio::test]
    async fn test_enabled_gate_round_trips() {
        let flags = CapabilityFlags {
            mc_personalisation_persistence_enabled: true,
            ..Default::default()
        };
        let gate = PersonalisationGate::new(flags, Arc::new(MemoryPreferenceStore::new()));

        assert_eq!(gate.save("user-1", &prefs()).await.unwrap(), PersistOutcome::Saved);
        assert_eq!(gate.load("user-1").await, prefs());
        assert_eq!(gate.load("user-2").await, Preferences::default());
    }

    #[test]
    fn test_preferences_accept_partial_payload() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"hiddenModules": ["momentum"]}"#).unwrap();
        assert_eq!(prefs.hidden_modules, vec!["momentum".to_string()]);
        assert!(prefs.module_order.is_empty());
    }
}
