//! Static action catalog.
//!
//! Purely descriptive: which actions exist and what they are for. What an
//! action actually does lives in the handler table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const START_PRIORITY_ACTION: &str = "start-priority-action";
pub const OPEN_EMPTY_STATE_GUIDE: &str = "open-empty-state-guide";
pub const READ_INSIGHT: &str = "read-insight";
pub const LOG_CHECK_IN: &str = "log-check-in";
pub const EXPAND_PILLAR_OVERVIEW: &str = "expand-pillar-overview";
pub const OPEN_SUPPORT_RESOURCES: &str = "open-support-resources";
pub const OPEN_AI_COACH: &str = "open-ai-coach";

/// Description of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescription {
    pub id: String,
    pub description: String,
}

/// Lookup of action descriptions by id.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: BTreeMap<String, ActionDescription>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions exposed by the standard dashboard modules.
    pub fn defaults() -> Self {
        [
            (START_PRIORITY_ACTION, "Start today's priority action"),
            (OPEN_EMPTY_STATE_GUIDE, "Open the getting-started guide"),
            (READ_INSIGHT, "Read the narrative insight in full"),
            (LOG_CHECK_IN, "Log a daily check-in"),
            (EXPAND_PILLAR_OVERVIEW, "Expand the pillar overview"),
            (OPEN_SUPPORT_RESOURCES, "Open support resources"),
            (OPEN_AI_COACH, "Ask the AI coach"),
        ]
        .into_iter()
        .fold(Self::new(), |catalog, (id, description)| {
            catalog.with_action(id, description)
        })
    }

    /// Add or replace an action.
    pub fn with_action(mut self, id: impl Into<String>, description: impl Into<String>) -> Self {
        let id = id.into();
        self.actions.insert(
            id.clone(),
            ActionDescription {
                id,
                description: description.into(),
            },
        );
        self
    }

    pub fn get(&self, id: &str) -> Option<&ActionDescription> {
        self.actions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    /// All action ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
