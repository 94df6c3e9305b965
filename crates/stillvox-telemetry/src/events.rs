//! Structured decode events
//!
//! Every externally observable step of the decoder lifecycle is reported as
//! a typed event so behavior can be asserted on without parsing log output.

use parking_lot::Mutex;
use serde::Serialize;

/// One observable step in the decoder lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecodeEvent {
    ResourceCreated {
        graph_path: String,
        words: usize,
    },
    SessionCreated,
    UtteranceStarted,
    ChunkPushed {
        first: bool,
        last: bool,
        /// Frames fed to the search; 0 while the engine is buffering.
        frames: usize,
    },
    PushFailed {
        code: &'static str,
    },
    ResultEmitted {
        final_pass: bool,
        tokens: usize,
    },
}

/// Receives decode events. Implementations must be cheap; the sink is
/// called from the decode path.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DecodeEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: DecodeEvent) {}
}

/// Buffers events in memory for test assertions.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DecodeEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<DecodeEvent> {
        self.events.lock().clone()
    }

    pub fn drain(&self) -> Vec<DecodeEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: DecodeEvent) {
        self.events.lock().push(event);
    }
}
