//! AI coach invocation.
//!
//! Gated by `ai_invocation_enabled`. While the gate is closed every call
//! gets the same fixed [`AiStatus::Disabled`] response and no backend is
//! touched, so callers can tell "switched off" from "answered with nothing".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tracing::debug;

use mission_control::{CapabilityFlags, PillarKey};

use crate::error::AiError;
use crate::handler::{ActionContext, ActionHandler};

/// Message returned while AI invocation is switched off.
pub const DISABLED_MESSAGE: &str = "AI coaching is not available yet.";

/// Prompt used when the caller supplies none.
pub const DEFAULT_PROMPT: &str = "What should I focus on today?";

/// Request to the AI coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillar: Option<PillarKey>,
}

impl AiRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            pillar: None,
        }
    }

    pub fn with_pillar(mut self, pillar: PillarKey) -> Self {
        self.pillar = Some(pillar);
        self
    }

    /// Build from an action context (`prompt`, `pillar` keys).
    pub fn from_context(context: &ActionContext) -> Self {
        let prompt = context
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PROMPT);

        Self {
            prompt: prompt.to_string(),
            pillar: context
                .get("pillar")
                .and_then(Value::as_str)
                .and_then(PillarKey::parse),
        }
    }
}

/// How an AI call was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiStatus {
    /// Feature switched off
    Disabled,
    /// Backend answered
    Completed,
}

/// Response from the AI coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub status: AiStatus,
    pub message: String,
}

impl AiResponse {
    pub fn disabled() -> Self {
        Self {
            status: AiStatus::Disabled,
            message: DISABLED_MESSAGE.to_string(),
        }
    }
}

/// A provider that can answer coach requests.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Backend identifier.
    fn id(&self) -> &str;

    /// Whether the backend can take requests right now.
    async fn is_available(&self) -> bool;

    async fn complete(&self, request: &AiRequest) -> Result<String, AiError>;
}

/// Capability-gated entry point for AI calls.
pub struct AiGateway {
    flags: CapabilityFlags,
    backends: Vec<Arc<dyn AiBackend>>,
}

impl AiGateway {
    pub fn new(flags: CapabilityFlags) -> Self {
        Self {
            flags,
            backends: Vec::new(),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn AiBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.ai_invocation_enabled
    }

    /// Ask the coach.
    pub async fn invoke(&self, request: &AiRequest) -> Result<AiResponse, AiError> {
        if !self.is_enabled() {
            return Ok(AiResponse::disabled());
        }

        let backend = self.select_backend().await?;
        debug!(backend = %backend.id(), pillar = ?request.pillar, "Invoking AI backend");

        let message = backend.complete(request).await?;
        Ok(AiResponse {
            status: AiStatus::Completed,
            message,
        })
    }

    async fn select_backend(&self) -> Result<Arc<dyn AiBackend>, AiError> {
        for backend in &self.backends {
            if backend.is_available().await {
                return Ok(Arc::clone(backend));
            }
        }
        Err(AiError::NoBackendAvailable)
    }
}

/// Handler for the AI entry module's action.
pub struct AiEntryHandler {
    gateway: Arc<AiGateway>,
}

impl AiEntryHandler {
    pub fn new(gateway: Arc<AiGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ActionHandler for AiEntryHandler {
    async fn handle(&self, context: &ActionContext) -> anyhow::Result<Value> {
        let request = AiRequest::from_context(context);
        let response = self.gateway.invoke(&request).await?;
        Ok(serde_json::to_value(response)?)
    }
}

/// Mock backend for testing.
pub struct MockBackend {
    backend_id: String,
    available: AtomicBool,
    response: String,
    call_count: AtomicU32,
}

impl MockBackend {
    pub fn new(backend_id: impl Into<String>) -> Self {
        Self {
            backend_id: backend_id.into(),
            available: AtomicBool::new(true),
            response: "Mock coaching reply".to_string(),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Number of `complete` calls so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-coach")
    }
}

#[async_trait]
impl AiBackend for MockBackend {
    fn id(&self) -> &str {
        &self.backend_id
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn complete(&self, _request: &AiRequest) -> Result<String, AiError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(AiError::Backend("Mock backend disabled".to_string()));
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_disabled_gateway_never_calls_backend() {
        let backend = Arc::new(MockBackend::default());
        let gateway = AiGateway::new(CapabilityFlags::disabled()).with_backend(backend.clone());

        let response = gateway.invoke(&AiRequest::new("hello")).await.unwrap();
        assert_eq!(response, AiResponse::disabled());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_gateway_uses_first_available_backend() {
        let down = Arc::new(MockBackend::new("down").with_available(false));
        let up = Arc::new(MockBackend::new("up").with_response("Sleep earlier tonight."));
        let gateway = AiGateway::new(CapabilityFlags::default().with_ai_invocation(true))
            .with_backend(down.clone())
            .with_backend(up.clone());

        let response = gateway
            .invoke(&AiRequest::new("help").with_pillar(PillarKey::Sleep))
            .await
            .unwrap();
        assert_eq!(response.status, AiStatus::Completed);
        assert_eq!(response.message, "Sleep earlier tonight.");
        assert_eq!(down.call_count(), 0);
        assert_eq!(up.call_count(), 1);
    }

    #[tokio::test]
    async fn test_enabled_without_backend_errors() {
        let gateway = AiGateway::new(CapabilityFlags::all_enabled());
        let result = gateway.invoke(&AiRequest::new("hi")).await;
        assert!(matches!(result, Err(AiError::NoBackendAvailable)));
    }

    #[tokio::test]
    async fn test_entry_handler_reports_disabled() {
        let handler = AiEntryHandler::new(Arc::new(AiGateway::new(CapabilityFlags::disabled())));
        let result = handler.handle(&ActionContext::new()).await.unwrap();
        assert_eq!(result["status"], "disabled");
        assert_eq!(result["message"], DISABLED_MESSAGE);
    }

    #[test]
    fn test_request_from_context() {
        let mut context = ActionContext::new();
        context.insert("pillar".to_string(), json!("mental"));
        context.insert("prompt".to_string(), json!("   "));

        let request = AiRequest::from_context(&context);
        assert_eq!(request.prompt, DEFAULT_PROMPT);
        assert_eq!(request.pillar, Some(PillarKey::Mental));
    }
}
