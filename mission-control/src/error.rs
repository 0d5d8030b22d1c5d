//! Error types for Mission Control.

/// Errors from the fallible edges of Mission Control. Composition itself
/// never fails.
#[derive(Debug, thiserror::Error)]
pub enum MissionControlError {
    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A dispatch table was set up incorrectly
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Preference storage failed
    #[error("Preference store error: {0}")]
    PreferenceStore(String),
}

/// Dispatch table setup errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Each module type maps to exactly one renderer
    #[error("Renderer already registered for {0}")]
    DuplicateHandler(crate::types::ModuleType),
}

pub type Result<T> = std::result::Result<T, MissionControlError>;
