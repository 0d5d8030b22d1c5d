//! Event sinks.
//!
//! A sink receives lifecycle events and appends them somewhere. Sinks may
//! fail; the emitter is responsible for making sure those failures stop
//! here.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use mission_control::PersistenceConfig;

use crate::error::SinkError;
use crate::event::ActionLifecycleEvent;

/// Destination for lifecycle events. Append only.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn append(&self, event: &ActionLifecycleEvent) -> Result<(), SinkError>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn append(&self, _event: &ActionLifecycleEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps events in memory, in arrival order.
#[derive(Default)]
pub struct MemorySink {
    events: Arc<RwLock<Vec<ActionLifecycleEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub async fn events(&self) -> Vec<ActionLifecycleEvent> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn append(&self, event: &ActionLifecycleEvent) -> Result<(), SinkError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }
}

/// Append-only JSON-lines log on local disk, one event per line.
pub struct LocalEventLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalEventLog {
    /// Log at an explicit path. Parent directories are created on first
    /// append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Log described by persistence config, if it names a directory.
    pub fn from_config(config: &PersistenceConfig) -> Option<Self> {
        config.log_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every well-formed event. A missing file is an empty log;
    /// corrupt lines are skipped.
    pub async fn read_all(&self) -> Result<Vec<ActionLifecycleEvent>, SinkError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let events = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str(line) {
                Ok(event) => Some(event),
                Err(e) => {
                    debug!(line = index + 1, error = %e, "Skipping corrupt event log line");
                    None
                }
            })
            .collect();

        Ok(events)
    }
}

#[async_trait]
impl EventSink for LocalEventLog {
    async fn append(&self, event: &ActionLifecycleEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }
}

/// Delivers each event to several sinks. Every sink is attempted even when
/// others fail.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl EventSink for FanoutSink {
    async fn append(&self, event: &ActionLifecycleEvent) -> Result<(), SinkError> {
        let results =
            futures::future::join_all(self.sinks.iter().map(|sink| sink.append(event))).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            return Err(SinkError::Partial {
                failed,
                total: self.sinks.len(),
            });
        }
        Ok(())
    }
}
