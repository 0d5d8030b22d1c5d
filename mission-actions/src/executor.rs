//! Action execution.
//!
//! `execute` runs exactly one handler once per call, bracketed by an
//! `invoked` event before and a `completed` event after. Event emission is
//! best-effort and isolated from the handler's result: the only error that
//! reaches the caller is the handler's own.

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use mission_control::{Environment, MissionControlConfig};

use crate::ai::AiGateway;
use crate::catalog::ActionCatalog;
use crate::emitter::LifecycleEmitter;
use crate::event::{ActionLifecycleEvent, Outcome};
use crate::handler::{ActionContext, HandlerTable};
use crate::sink::EventSink;
use crate::telemetry::DURATION_META_KEY;

/// Runs catalog actions through their handlers.
#[derive(Clone)]
pub struct ActionExecutor {
    catalog: Arc<ActionCatalog>,
    handlers: Arc<HandlerTable>,
    emitter: LifecycleEmitter,
    environment: Environment,
}

impl ActionExecutor {
    pub fn new(catalog: ActionCatalog, handlers: HandlerTable, emitter: LifecycleEmitter) -> Self {
        Self {
            catalog: Arc::new(catalog),
            handlers: Arc::new(handlers),
            emitter,
            environment: Environment::default(),
        }
    }

    /// Executor with the default catalog and handlers, wired from config.
    pub fn from_config(config: &MissionControlConfig, sink: Arc<dyn EventSink>) -> Self {
        let ai = Arc::new(AiGateway::new(config.capabilities));
        Self::new(
            ActionCatalog::defaults(),
            HandlerTable::defaults(ai),
            LifecycleEmitter::new(config.capabilities, sink),
        )
        .with_environment(config.environment)
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn emitter(&self) -> &LifecycleEmitter {
        &self.emitter
    }

    /// Execute with an empty context.
    pub async fn run(&self, action_id: &str) -> anyhow::Result<Option<Value>> {
        self.execute(action_id, ActionContext::new()).await
    }

    /// Execute an action by id.
    ///
    /// Unknown actions and actions without a handler resolve to `Ok(None)`.
    /// A handler failure is returned unchanged, after the `completed`
    /// event has been attempted.
    pub async fn execute(
        &self,
        action_id: &str,
        context: ActionContext,
    ) -> anyhow::Result<Option<Value>> {
        if !self.catalog.contains(action_id) {
            if !self.environment.is_production() {
                warn!(action_id = %action_id, "Unknown action");
            }
            return Ok(None);
        }

        let Some(handler) = self.handlers.get(action_id) else {
            if !self.environment.is_production() {
                info!(action_id = %action_id, "Action has no handler yet");
            }
            return Ok(None);
        };

        let execution_id = uuid::Uuid::new_v4().to_string();

        self.emitter
            .emit(
                ActionLifecycleEvent::invoked(action_id)
                    .with_meta("executionId", execution_id.clone()),
            )
            .await;

        let started = Instant::now();
        let result = handler.handle(&context).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let outcome = if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Error
        };

        debug!(
            action_id = %action_id,
            execution_id = %execution_id,
            outcome = ?outcome,
            duration_ms,
            "Action settled"
        );

        self.emitter
            .emit(
                ActionLifecycleEvent::completed(action_id, outcome)
                    .with_meta("executionId", execution_id)
                    .with_meta(DURATION_META_KEY, duration_ms),
            )
            .await;

        result.map(Some)
    }
}
