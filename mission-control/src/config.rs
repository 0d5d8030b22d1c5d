//! Configuration for Mission Control.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capability::CapabilityFlags;
use crate::error::Result;

/// Default storage identifier for the lifecycle event log.
pub const DEFAULT_STORAGE_KEY: &str = "northstar.mission-control.events";

/// Runtime environment. Development logs placeholder and unknown-action
/// conditions; production stays quiet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Top-level Mission Control configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionControlConfig {
    /// Runtime environment
    pub environment: Environment,
    /// Feature gates
    pub capabilities: CapabilityFlags,
    /// Event persistence settings
    pub persistence: PersistenceConfig,
}

impl MissionControlConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            ..Default::default()
        }
    }
}

/// Event persistence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Directory for the local event log; `None` keeps events in memory
    pub log_dir: Option<PathBuf>,
    /// File stem of the local event log
    pub storage_key: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl PersistenceConfig {
    /// Full path of the event log, if a directory is configured.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.jsonl", self.storage_key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MissionControlConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.capabilities, CapabilityFlags::disabled());
        assert_eq!(config.persistence.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.persistence.log_path().is_none());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = MissionControlConfig::production();
        config.capabilities.mc_persistence_enabled = true;
        config.persistence.log_dir = Some(PathBuf::from("/var/lib/northstar"));

        let yaml = config.to_yaml().unwrap();
        let parsed = MissionControlConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
environment: production
capabilities:
  MC_PERSISTENCE_ENABLED: true
persistence:
  log_dir: /tmp/mc
"#;
        let config = MissionControlConfig::from_yaml(yaml).unwrap();
        assert!(config.environment.is_production());
        assert!(config.capabilities.mc_persistence_enabled);
        assert!(!config.capabilities.ai_invocation_enabled);
        assert_eq!(
            config.persistence.log_path(),
            Some(PathBuf::from("/tmp/mc/northstar.mission-control.events.jsonl"))
        );
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(MissionControlConfig::from_yaml("environment: [staging").is_err());
    }
}
