//! Composition engine - decides which dashboard modules to show and in
//! what order.
//!
//! This is a fixed decision ladder, not a ranking: exactly one headline
//! module, then the conditional and always-on modules in a hard-coded
//! sequence, with the AI entry last.
//!
//! ```text
//! raw state ──▶ normalize ──▶ headline ──▶ insight? ──▶ score ──▶ pillars
//!                                                                   │
//!                   AI entry ◀── support? ◀── momentum? ◀───────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::personalisation::Preferences;
use crate::registry;
use crate::state::{self, NormalizedUserState};
use crate::types::{
    Emphasis, ModuleDescriptor, ModuleType, PillarKey, PILLAR_ATTENTION_THRESHOLD,
};

/// Headline reason for unauthenticated users.
pub const REASON_AUTH: &str = "auth";
/// Headline reason for users with no data yet.
pub const REASON_NO_DATA: &str = "no-data";
/// Headline reason when a pillar is below threshold.
pub const REASON_PILLAR: &str = "pillar-below-threshold";
/// Headline reason when nothing more specific applies.
pub const REASON_DEFAULT: &str = "Highest-impact action for today";

/// Clock information for a composition call.
///
/// Not consulted by the current ladder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeContext {
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Local hour of day, 0-23
    #[serde(default)]
    pub local_hour: Option<u8>,
}

impl TimeContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Some(now),
            local_hour: None,
        }
    }
}

/// Compose the dashboard for a raw user-state payload.
///
/// Total and pure: never panics, performs no I/O, and equal inputs give
/// equal output.
pub fn compose(
    raw: &Value,
    time: &TimeContext,
    preferences: &Preferences,
) -> Vec<ModuleDescriptor> {
    #[cfg(debug_assertions)]
    registry::check_consistency_once();

    let state = state::normalize(raw);

    // These two read the raw payload, not the normalized state. A missing
    // `isAuthenticated` or `lifeScore` must not trigger them; only an
    // explicit `false` / `0` does. Keep it that way.
    let unauthenticated = state::is_explicitly_unauthenticated(raw);
    let has_no_data = state::has_zero_life_score(raw);

    let priority = priority_pillar(&state);

    debug!(
        unauthenticated,
        has_no_data,
        priority_pillar = ?priority,
        now = ?time.now,
        hidden = preferences.hidden_modules.len(),
        "Composing mission control"
    );

    let mut modules = Vec::with_capacity(8);

    modules.push(headline(unauthenticated, has_no_data, priority));

    if !unauthenticated && !has_no_data && state.has_any_data && !state.today_completed {
        modules.push(descriptor(ModuleType::NarrativeInsight));
    }

    modules.push(descriptor(ModuleType::OverallScore).with_emphasis(Emphasis::Secondary));

    modules.push(
        descriptor(ModuleType::PillarOverview)
            .user_configurable(true)
            .collapsed(true),
    );

    if state.momentum.check_ins > 0.0 {
        modules.push(descriptor(ModuleType::Momentum));
    }

    // Safety override: never suppressed by the headline choice.
    if state.distress_signals {
        modules.push(descriptor(ModuleType::Support).with_reason("distress-signals"));
    }

    modules.push(descriptor(ModuleType::AiEntry));

    modules
}

/// First pillar, in fixed priority order, whose score is below threshold.
///
/// Order wins over magnitude: a sleep score of 55 beats a nutrition score
/// of 10.
pub fn priority_pillar(state: &NormalizedUserState) -> Option<PillarKey> {
    PillarKey::PRIORITY_ORDER.into_iter().find(|pillar| {
        state
            .pillar_score(*pillar)
            .is_some_and(|score| score < PILLAR_ATTENTION_THRESHOLD)
    })
}

fn headline(
    unauthenticated: bool,
    has_no_data: bool,
    priority: Option<PillarKey>,
) -> ModuleDescriptor {
    if unauthenticated {
        return descriptor(ModuleType::PriorityAction)
            .with_reason(REASON_AUTH)
            .with_emphasis(Emphasis::Primary);
    }

    if has_no_data {
        return descriptor(ModuleType::EmptyStateGuidance)
            .with_reason(REASON_NO_DATA)
            .with_emphasis(Emphasis::Primary);
    }

    match priority {
        Some(pillar) => descriptor(ModuleType::PriorityAction)
            .with_reason(REASON_PILLAR)
            .with_pillar(pillar)
            .with_emphasis(Emphasis::Primary),
        None => descriptor(ModuleType::PriorityAction)
            .with_reason(REASON_DEFAULT)
            .with_emphasis(Emphasis::Primary),
    }
}

fn descriptor(module_type: ModuleType) -> ModuleDescriptor {
    ModuleDescriptor::new(registry::id_for(module_type), module_type)
}
