use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// One HTTP exchange with the catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub id: uuid::Uuid,
    pub at: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub status: Option<u16>,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

impl RequestLogEntry {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            at: Utc::now(),
            method: method.into(),
            path: path.into(),
            status: None,
            elapsed_ms: 0,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

/// Receives every entry as it is recorded
pub trait LogSink: Send + Sync {
    fn record(&self, entry: &RequestLogEntry);
}

/// Forwards entries to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, entry: &RequestLogEntry) {
        match (&entry.error, entry.status) {
            (Some(err), _) => tracing::warn!(
                request_id = %entry.id,
                "{} {} failed after {}ms: {}",
                entry.method, entry.path, entry.elapsed_ms, err
            ),
            (None, Some(status)) => tracing::debug!(
                request_id = %entry.id,
                "{} {} -> {} in {}ms",
                entry.method, entry.path, status, entry.elapsed_ms
            ),
            (None, None) => tracing::debug!(
                request_id = %entry.id,
                "{} {} (no status) in {}ms",
                entry.method, entry.path, entry.elapsed_ms
            ),
        }
    }
}

/// Bounded in-memory request log
///
/// Keeps the most recent `capacity` entries, dropping the oldest first.
/// Nothing is persisted.
pub struct RequestLog {
    capacity: usize,
    entries: Mutex<VecDeque<RequestLogEntry>>,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl RequestLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            sinks: Vec::new(),
        }
    }

    /// Builder-style helper to attach a sink
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, entry: RequestLogEntry) {
        for sink in &self.sinks {
            sink.record(&entry);
        }

        if self.capacity == 0 {
            return;
        }

        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of the buffered entries, oldest first
    pub fn entries(&self) -> Vec<RequestLogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<RequestLogEntry>> {
        // Sinks run outside the lock, so a poisoned deque is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new(200).with_sink(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for RequestLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLog")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
