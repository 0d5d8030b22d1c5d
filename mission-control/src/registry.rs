//! Static catalog of dashboard modules.
//!
//! The renderer dispatches on [`ModuleType`], so each type must appear at
//! most once here. `order` is a sort hint reserved for personalization; the
//! composition ladder does not consult it.

use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

use crate::types::ModuleType;

/// Metadata for one known module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Stable module id
    pub id: &'static str,
    /// Canonical module type
    pub module_type: ModuleType,
    /// Sort hint
    pub order: u32,
    /// Shown unless the user hides it
    pub default_visible: bool,
}

pub const PRIORITY_ACTION: &str = "priority-action";
pub const EMPTY_STATE_GUIDANCE: &str = "empty-state-guidance";
pub const NARRATIVE_INSIGHT: &str = "narrative-insight";
pub const OVERALL_SCORE: &str = "overall-score";
pub const PILLAR_OVERVIEW: &str = "pillar-overview";
pub const MOMENTUM: &str = "momentum";
pub const SUPPORT: &str = "support";
pub const AI_ENTRY: &str = "ai-entry";

static REGISTRY: [RegistryEntry; 8] = [
    RegistryEntry {
        id: PRIORITY_ACTION,
        module_type: ModuleType::PriorityAction,
        order: 10,
        default_visible: true,
    },
    RegistryEntry {
        id: EMPTY_STATE_GUIDANCE,
        module_type: ModuleType::EmptyStateGuidance,
        order: 10,
        default_visible: true,
    },
    RegistryEntry {
        id: NARRATIVE_INSIGHT,
        module_type: ModuleType::NarrativeInsight,
        order: 20,
        default_visible: true,
    },
    RegistryEntry {
        id: OVERALL_SCORE,
        module_type: ModuleType::OverallScore,
        order: 30,
        default_visible: true,
    },
    RegistryEntry {
        id: PILLAR_OVERVIEW,
        module_type: ModuleType::PillarOverview,
        order: 40,
        default_visible: true,
    },
    RegistryEntry {
        id: MOMENTUM,
        module_type: ModuleType::Momentum,
        order: 50,
        default_visible: false,
    },
    RegistryEntry {
        id: SUPPORT,
        module_type: ModuleType::Support,
        order: 60,
        default_visible: false,
    },
    RegistryEntry {
        id: AI_ENTRY,
        module_type: ModuleType::AiEntry,
        order: 90,
        default_visible: true,
    },
];

/// All registered modules, in declaration order.
pub fn entries() -> &'static [RegistryEntry] {
    &REGISTRY
}

/// Look up a module by id.
pub fn get(id: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.id == id)
}

/// Look up the module registered for a type.
pub fn for_type(module_type: ModuleType) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.module_type == module_type)
}

/// Registry id for a type. Every [`ModuleType`] is registered, so the
/// fallback only matters if the table is edited incorrectly.
pub fn id_for(module_type: ModuleType) -> &'static str {
    match for_type(module_type) {
        Some(entry) => entry.id,
        None => {
            warn!(module_type = %module_type, "Module type missing from registry");
            "unregistered"
        }
    }
}

/// Default-visible modules sorted by their `order` hint (ties keep
/// declaration order).
pub fn default_visible() -> Vec<&'static RegistryEntry> {
    let mut visible: Vec<_> = REGISTRY.iter().filter(|e| e.default_visible).collect();
    visible.sort_by_key(|e| e.order);
    visible
}

static CONSISTENCY: OnceLock<Vec<ModuleType>> = OnceLock::new();

/// Report module types registered more than once.
pub fn check_consistency() -> Vec<ModuleType> {
    find_duplicate_types(&REGISTRY)
}

/// [`check_consistency`], run at most once per process. Later calls return
/// the cached result without logging again.
pub fn check_consistency_once() -> &'static [ModuleType] {
    CONSISTENCY.get_or_init(check_consistency)
}

/// Whether [`check_consistency_once`] has run in this process.
pub fn consistency_checked() -> bool {
    CONSISTENCY.get().is_some()
}

/// Duplicate types in an arbitrary entry set. Each duplicate is logged;
/// nothing here fails.
pub fn find_duplicate_types(entries: &[RegistryEntry]) -> Vec<ModuleType> {
    let mut seen: HashMap<ModuleType, &str> = HashMap::new();
    let mut duplicates = Vec::new();

    for entry in entries {
        if let Some(first) = seen.get(&entry.module_type) {
            warn!(
                module_type = %entry.module_type,
                first_id = %first,
                duplicate_id = %entry.id,
                "Duplicate module type in registry; rendering will be ambiguous"
            );
            if !duplicates.contains(&entry.module_type) {
                duplicates.push(entry.module_type);
            }
        } else {
            seen.insert(entry.module_type, entry.id);
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_types_are_unique() {
        assert!(check_consistency().is_empty());
    }

    #[test]
    fn test_consistency_check_runs_once() {
        let first = check_consistency_once();
        assert!(consistency_checked());
        assert!(first.is_empty());
        assert!(std::ptr::eq(first, check_consistency_once()));
    }

    #[test]
    fn test_every_type_registered() {
        for module_type in ModuleType::ALL {
            let entry = for_type(module_type).unwrap();
            assert_eq!(entry.module_type, module_type);
            assert_eq!(id_for(module_type), entry.id);
        }
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(get(SUPPORT).unwrap().module_type, ModuleType::Support);
        assert!(get("unknown-module").is_none());
    }

    #[test]
    fn test_duplicates_are_reported_not_fatal() {
        let entries = [
            RegistryEntry {
                id: "a",
                module_type: ModuleType::Momentum,
                order: 1,
                default_visible: true,
            },
            RegistryEntry {
                id: "b",
                module_type: ModuleType::Momentum,
                order: 2,
                default_visible: true,
            },
            RegistryEntry {
                id: "c",
                module_type: ModuleType::Momentum,
                order: 3,
                default_visible: true,
            },
        ];

        assert_eq!(find_duplicate_types(&entries), vec![ModuleType::Momentum]);
    }

    #[test]
    fn test_default_visible_sorted() {
        let visible = default_visible();
        assert!(visible.windows(2).all(|w| w[0].order <= w[1].order));
        assert!(visible.iter().all(|e| e.default_visible));
        assert!(!visible.iter().any(|e| e.id == SUPPORT));
    }
}
