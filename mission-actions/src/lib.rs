//! Mission Actions - action execution and lifecycle events
//!
//! Runs the actions surfaced by Mission Control modules and records what
//! happened:
//! - **Catalog / handlers**: what an action is vs. what it does
//! - **Executor**: one handler call per invocation, bracketed by
//!   `invoked` / `completed` events
//! - **Emitter**: capability-gated event delivery that never fails the
//!   caller
//! - **Sinks**: memory, local JSON-lines log, fan-out, telemetry
//! - **AI gateway**: gated coach invocation with a fixed disabled response
//!
//! # Architecture
//!
//! ```text
//! execute(id, ctx)
//!     │
//!     ├─▶ catalog lookup ──▶ handler lookup
//!     │
//!     ├─▶ emit(invoked) ─┐
//!     ├─▶ handler        │  LifecycleEmitter ──▶ EventSink(s)
//!     └─▶ emit(completed)┘   (gated, errors dropped)
//! ```

pub mod ai;
pub mod catalog;
pub mod emitter;
pub mod error;
pub mod event;
pub mod executor;
pub mod handler;
pub mod sink;
pub mod telemetry;

pub use ai::{AiBackend, AiGateway, AiRequest, AiResponse, AiStatus};
pub use catalog::{ActionCatalog, ActionDescription};
pub use emitter::LifecycleEmitter;
pub use error::{AiError, SinkError};
pub use event::{ActionLifecycleEvent, LifecycleStage, Outcome};
pub use executor::ActionExecutor;
pub use handler::{handler_fn, ActionContext, ActionHandler, HandlerTable, PlaceholderHandler, UiEffect};
pub use sink::{EventSink, FanoutSink, LocalEventLog, MemorySink, NullSink};
pub use telemetry::{ActionStats, TelemetryAggregator};
