//! Capability flags.
//!
//! Static gates that switch whole subsystems on or off. Built once at
//! startup and passed into whatever needs them; never mutated afterwards.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Process-wide feature gates. Everything is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct CapabilityFlags {
    /// Allow calls out to an AI backend
    #[serde(alias = "AI_INVOCATION_ENABLED")]
    pub ai_invocation_enabled: bool,
    /// Persist action lifecycle events
    #[serde(alias = "MC_PERSISTENCE_ENABLED")]
    pub mc_persistence_enabled: bool,
    /// Persist dashboard personalisation
    #[serde(alias = "MC_PERSONALISATION_PERSISTENCE_ENABLED")]
    pub mc_personalisation_persistence_enabled: bool,
}

impl CapabilityFlags {
    /// All gates closed.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// All gates open.
    pub fn all_enabled() -> Self {
        Self {
            ai_invocation_enabled: true,
            mc_persistence_enabled: true,
            mc_personalisation_persistence_enabled: true,
        }
    }

    pub fn with_ai_invocation(mut self, enabled: bool) -> Self {
        self.ai_invocation_enabled = enabled;
        self
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.mc_persistence_enabled = enabled;
        self
    }

    pub fn with_personalisation_persistence(mut self, enabled: bool) -> Self {
        self.mc_personalisation_persistence_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_off_by_default() {
        let flags = CapabilityFlags::default();
        assert!(!flags.ai_invocation_enabled);
        assert!(!flags.mc_persistence_enabled);
        assert!(!flags.mc_personalisation_persistence_enabled);
        assert_eq!(flags, CapabilityFlags::disabled());
    }

    #[test]
    fn test_legacy_flag_names() {
        let flags: CapabilityFlags =
            serde_json::from_str(r#"{"AI_INVOCATION_ENABLED": true, "mc_persistence_enabled": true}"#)
                .unwrap();
        assert!(flags.ai_invocation_enabled);
        assert!(flags.mc_persistence_enabled);
        assert!(!flags.mc_personalisation_persistence_enabled);
    }
}
