//! Core Mission Control types.
//!
//! These are the wire shapes handed to the presentation layer, so their
//! serialized form follows the front end's camelCase / SCREAMING_SNAKE_CASE
//! conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Score below which a pillar is considered in need of attention.
pub const PILLAR_ATTENTION_THRESHOLD: f64 = 60.0;

/// Wellness life-domains tracked by NorthStar.
///
/// Variant order is the fixed priority order used when picking the
/// headline pillar: sleep is always considered before nutrition, nutrition
/// before mental, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum PillarKey {
    Sleep,
    Nutrition,
    Mental,
    Exercise,
    Physical,
    Finances,
    Social,
    Purpose,
}

impl PillarKey {
    /// All pillars, in priority order.
    pub const PRIORITY_ORDER: [PillarKey; 8] = [
        PillarKey::Sleep,
        PillarKey::Nutrition,
        PillarKey::Mental,
        PillarKey::Exercise,
        PillarKey::Physical,
        PillarKey::Finances,
        PillarKey::Social,
        PillarKey::Purpose,
    ];

    /// Key as it appears in user-state payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PillarKey::Sleep => "sleep",
            PillarKey::Nutrition => "nutrition",
            PillarKey::Mental => "mental",
            PillarKey::Exercise => "exercise",
            PillarKey::Physical => "physical",
            PillarKey::Finances => "finances",
            PillarKey::Social => "social",
            PillarKey::Purpose => "purpose",
        }
    }

    /// Parse a payload key. Unknown keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        Self::PRIORITY_ORDER
            .iter()
            .copied()
            .find(|pillar| pillar.as_str() == key)
    }
}

impl fmt::Display for PillarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of dashboard module kinds. The renderer dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleType {
    /// The single headline action for today
    PriorityAction,
    /// Onboarding guidance for users with no data yet
    EmptyStateGuidance,
    /// Short narrative about recent progress
    NarrativeInsight,
    /// Overall life score
    OverallScore,
    /// Grid of per-pillar scores
    PillarOverview,
    /// Check-in and streak momentum
    Momentum,
    /// Support resources, shown on distress signals
    Support,
    /// Entry point to the AI coach
    AiEntry,
}

impl ModuleType {
    /// Every module type.
    pub const ALL: [ModuleType; 8] = [
        ModuleType::PriorityAction,
        ModuleType::EmptyStateGuidance,
        ModuleType::NarrativeInsight,
        ModuleType::OverallScore,
        ModuleType::PillarOverview,
        ModuleType::Momentum,
        ModuleType::Support,
        ModuleType::AiEntry,
    ];

    /// Whether this type may occupy the headline slot.
    pub fn is_headline(&self) -> bool {
        matches!(self, ModuleType::PriorityAction | ModuleType::EmptyStateGuidance)
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleType::PriorityAction => "PRIORITY_ACTION",
            ModuleType::EmptyStateGuidance => "EMPTY_STATE_GUIDANCE",
            ModuleType::NarrativeInsight => "NARRATIVE_INSIGHT",
            ModuleType::OverallScore => "OVERALL_SCORE",
            ModuleType::PillarOverview => "PILLAR_OVERVIEW",
            ModuleType::Momentum => "MOMENTUM",
            ModuleType::Support => "SUPPORT",
            ModuleType::AiEntry => "AI_ENTRY",
        };
        f.write_str(name)
    }
}

/// Visual weight hint for a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Primary,
    Secondary,
}

/// One entry of a composed dashboard. Position in the composed list is
/// its priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    /// Registry id
    pub id: String,
    /// Module kind
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    /// Rationale, for debugging and telemetry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Pillar the module is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillar: Option<PillarKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Emphasis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_configurable: Option<bool>,
}

impl ModuleDescriptor {
    /// Create a bare descriptor.
    pub fn new(id: impl Into<String>, module_type: ModuleType) -> Self {
        Self {
            id: id.into(),
            module_type,
            reason: None,
            pillar: None,
            emphasis: None,
            collapsed: None,
            user_configurable: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_pillar(mut self, pillar: PillarKey) -> Self {
        self.pillar = Some(pillar);
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = Some(emphasis);
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    pub fn user_configurable(mut self, configurable: bool) -> Self {
        self.user_configurable = Some(configurable);
        self
    }
}
