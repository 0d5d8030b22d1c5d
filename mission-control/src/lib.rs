//! Mission Control - NorthStar dashboard module composition
//!
//! Decides which dashboard modules a user sees, in what order:
//! - **State normalization**: untrusted user-state payloads become a total,
//!   typed record
//! - **Module registry**: static catalog of known modules
//! - **Composition engine**: a deterministic rule ladder that always
//!   surfaces one headline module
//! - **Dispatch**: maps composed modules to presentation renderers
//! - **Capability flags**: static gates for AI, persistence and
//!   personalisation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌────────────┐    ┌──────────────────┐
//! │ raw payload  │───▶│ normalize  │───▶│ compose (ladder) │
//! └──────────────┘    └────────────┘    └────────┬─────────┘
//!                                                │ Vec<ModuleDescriptor>
//!                                       ┌────────▼─────────┐
//!                                       │  DispatchTable   │
//!                                       └──────────────────┘
//! ```

pub mod capability;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod personalisation;
pub mod registry;
pub mod state;
pub mod types;

pub use capability::CapabilityFlags;
pub use config::{Environment, MissionControlConfig, PersistenceConfig};
pub use dispatch::{DispatchTable, ModuleRenderer};
pub use engine::{compose, priority_pillar, TimeContext};
pub use error::{DispatchError, MissionControlError};
pub use personalisation::{
    MemoryPreferenceStore, PersistOutcome, PersonalisationGate, PreferenceStore, Preferences,
};
pub use registry::RegistryEntry;
pub use state::{normalize, NormalizedUserState};
pub use types::*;
