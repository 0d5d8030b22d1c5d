//! Capability-gated, failure-isolated lifecycle emission.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use mission_control::CapabilityFlags;

use crate::event::{ActionLifecycleEvent, LifecycleStage};
use crate::sink::{EventSink, NullSink};

/// Front door to an [`EventSink`].
///
/// With persistence disabled nothing reaches the sink. Sink failures are
/// logged and dropped; `emit` has no error channel.
#[derive(Clone)]
pub struct LifecycleEmitter {
    flags: CapabilityFlags,
    sink: Arc<dyn EventSink>,
}

impl LifecycleEmitter {
    pub fn new(flags: CapabilityFlags, sink: Arc<dyn EventSink>) -> Self {
        Self { flags, sink }
    }

    /// Emitter that drops everything.
    pub fn disabled() -> Self {
        Self::new(CapabilityFlags::disabled(), Arc::new(NullSink))
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.mc_persistence_enabled
    }

    /// Best-effort emission.
    pub async fn emit(&self, event: ActionLifecycleEvent) {
        if !self.is_enabled() {
            return;
        }

        if let Err(e) = self.sink.append(&event).await {
            debug!(
                action_id = %event.action_id(),
                stage = ?event.stage(),
                error = %e,
                "Lifecycle event dropped"
            );
        }
    }

    /// Record a user-facing stage (`shown`, `acted`, `deferred`,
    /// `dismissed`) for an action.
    pub async fn record(
        &self,
        stage: LifecycleStage,
        action_id: &str,
        meta: Option<Map<String, Value>>,
    ) {
        let event = meta
            .into_iter()
            .flatten()
            .fold(ActionLifecycleEvent::new(stage, action_id), |event, (k, v)| {
                event.with_meta(k, v)
            });
        self.emit(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::sink::MemorySink;
    use async_trait::async_trait;

    struct BrokenSink;

    #[async_trait]
    impl EventSink for BrokenSink {
        async fn append(&self, _event: &ActionLifecycleEvent) -> Result<(), SinkError> {
            Err(SinkError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[tokio::test]
    async fn test_disabled_emitter_stores_nothing() {
        let sink = Arc::new(MemorySink::new());
        let emitter = LifecycleEmitter::new(CapabilityFlags::disabled(), sink.clone());

        emitter.emit(ActionLifecycleEvent::invoked("a")).await;
        emitter.record(LifecycleStage::Shown, "a", None).await;

        assert!(sink.is_empty().await);
    }

    #[tokio::test]
    async fn test_enabled_emitter_forwards() {
        let sink = Arc::new(MemorySink::new());
        let emitter =
            LifecycleEmitter::new(CapabilityFlags::default().with_persistence(true), sink.clone());

        let mut meta = Map::new();
        meta.insert("moduleId".to_string(), Value::from("support"));
        emitter
            .record(LifecycleStage::Dismissed, "open-support-resources", Some(meta))
            .await;

        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stage(), LifecycleStage::Dismissed);
        assert_eq!(
            events[0].meta_value("moduleId"),
            Some(&Value::from("support"))
        );
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let emitter = LifecycleEmitter::new(
            CapabilityFlags::default().with_persistence(true),
            Arc::new(BrokenSink),
        );
        emitter.emit(ActionLifecycleEvent::invoked("a")).await;
    }
}
