//! In-memory event recorder for testing.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::events::{DetectionEvent, EventEnvelope, EventRecorder};

/// Keeps every recorded event. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    events: Arc<Mutex<Vec<EventEnvelope>>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.lock().clone()
    }

    pub fn events(&self) -> Vec<DetectionEvent> {
        self.lock().iter().map(|e| e.event.clone()).collect()
    }

    /// Serialized type names, in recording order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.lock().iter().map(|e| e.event.kind()).collect()
    }

    pub fn has_event(&self, kind: &str) -> bool {
        self.count(kind) > 0
    }

    pub fn count(&self, kind: &str) -> usize {
        self.lock().iter().filter(|e| e.event.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl EventRecorder for MemoryRecorder {
    fn record(&self, event: DetectionEvent) {
        self.lock().push(EventEnvelope::now(event));
    }
}
