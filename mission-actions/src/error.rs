//! Error types for action execution plumbing.
//!
//! Handler failures are deliberately not modelled here: they travel as the
//! handler's own `anyhow::Error`, untouched.

/// Event sink failures. These never reach an action's caller.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Reading or writing the log failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An event could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Some sinks in a fan-out failed
    #[error("{failed} of {total} sinks failed")]
    Partial { failed: usize, total: usize },

    /// The sink refused the event
    #[error("Sink rejected event: {0}")]
    Rejected(String),
}

/// AI invocation errors.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Invocation is enabled but no backend can serve it
    #[error("No AI backend available")]
    NoBackendAvailable,

    /// Backend call failed
    #[error("AI backend error: {0}")]
    Backend(String),
}
