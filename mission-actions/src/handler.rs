//! Action handlers.
//!
//! The handler table is separate from the catalog on purpose: an action can
//! be described but not yet implemented, and that is a valid state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::ai::{AiEntryHandler, AiGateway};
use crate::catalog;

/// Free-form context passed to a handler.
pub type ActionContext = Map<String, Value>;

/// Executable behaviour for an action.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, context: &ActionContext) -> anyhow::Result<Value>;
}

/// Adapts an async closure into a handler.
pub struct FnHandler<F> {
    f: F,
}

/// Wrap an async closure as an [`ActionHandler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(ActionContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> ActionHandler for FnHandler<F>
where
    F: Fn(ActionContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    async fn handle(&self, context: &ActionContext) -> anyhow::Result<Value> {
        (self.f)(context.clone()).await
    }
}

/// Local UI effect a placeholder handler asks the presentation layer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiEffect {
    ScrollIntoView,
    OpenOverlay,
    Highlight,
}

/// Stands in for behaviour that is not built yet by describing a local UI
/// effect.
#[derive(Debug, Clone)]
pub struct PlaceholderHandler {
    effect: UiEffect,
    target: String,
}

impl PlaceholderHandler {
    pub fn new(effect: UiEffect, target: impl Into<String>) -> Self {
        Self {
            effect,
            target: target.into(),
        }
    }
}

#[async_trait]
impl ActionHandler for PlaceholderHandler {
    async fn handle(&self, context: &ActionContext) -> anyhow::Result<Value> {
        Ok(json!({
            "placeholder": true,
            "effect": self.effect,
            "target": self.target,
            "context": context,
        }))
    }
}

/// Handlers keyed by action id.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers for the default catalog. `read-insight` is intentionally
    /// left unimplemented.
    pub fn defaults(ai: Arc<AiGateway>) -> Self {
        Self::new()
            .with(
                catalog::START_PRIORITY_ACTION,
                Arc::new(PlaceholderHandler::new(UiEffect::Highlight, "priority-action")),
            )
            .with(
                catalog::OPEN_EMPTY_STATE_GUIDE,
                Arc::new(PlaceholderHandler::new(UiEffect::OpenOverlay, "getting-started")),
            )
            .with(
                catalog::LOG_CHECK_IN,
                Arc::new(PlaceholderHandler::new(UiEffect::OpenOverlay, "check-in")),
            )
            .with(
                catalog::EXPAND_PILLAR_OVERVIEW,
                Arc::new(PlaceholderHandler::new(UiEffect::ScrollIntoView, "pillar-overview")),
            )
            .with(
                catalog::OPEN_SUPPORT_RESOURCES,
                Arc::new(PlaceholderHandler::new(UiEffect::OpenOverlay, "support")),
            )
            .with(catalog::OPEN_AI_COACH, Arc::new(AiEntryHandler::new(ai)))
    }

    /// Register or replace a handler.
    pub fn register(&mut self, action_id: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(action_id.into(), handler);
    }

    pub fn with(mut self, action_id: impl Into<String>, handler: Arc<dyn ActionHandler>) -> Self {
        self.register(action_id, handler);
        self
    }

    pub fn get(&self, action_id: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(action_id).cloned()
    }

    pub fn has(&self, action_id: &str) -> bool {
        self.handlers.contains_key(action_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mission_control::CapabilityFlags;

    #[tokio::test]
    async fn test_placeholder_describes_effect() {
        let handler = PlaceholderHandler::new(UiEffect::ScrollIntoView, "pillar-overview");
        let mut context = ActionContext::new();
        context.insert("source".to_string(), json!("dashboard"));

        let result = handler.handle(&context).await.unwrap();
        assert_eq!(result["effect"], "scroll-into-view");
        assert_eq!(result["target"], "pillar-overview");
        assert_eq!(result["context"]["source"], "dashboard");
    }

    #[tokio::test]
    async fn test_closure_handler() {
        let handler = handler_fn(|context: ActionContext| async move {
            let n = context.get("n").and_then(Value::as_i64).unwrap_or(0);
            Ok::<_, anyhow::Error>(json!(n * 2))
        });

        let mut context = ActionContext::new();
        context.insert("n".to_string(), json!(21));
        assert_eq!(handler.handle(&context).await.unwrap(), json!(42));
    }

    #[test]
    fn test_defaults_leave_insight_unimplemented() {
        let ai = Arc::new(AiGateway::new(CapabilityFlags::disabled()));
        let table = HandlerTable::defaults(ai);

        assert!(table.has(catalog::OPEN_AI_COACH));
        assert!(table.has(catalog::LOG_CHECK_IN));
        assert!(!table.has(catalog::READ_INSIGHT));
    }
}
