use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared counters for one decode session, safe to read from a monitoring
/// thread while the decode path runs.
#[derive(Clone, Default)]
pub struct SessionMetrics {
    pub chunks_in: Arc<AtomicU64>,
    pub frames_scored: Arc<AtomicU64>,
    pub frames_pruned: Arc<AtomicU64>,
    pub buffering_chunks: Arc<AtomicU64>,
    pub push_errors: Arc<AtomicU64>,
    pub partial_results: Arc<AtomicU64>,
    pub final_results: Arc<AtomicU64>,
    pub utterances: Arc<AtomicU64>,
    pub last_result_time: Arc<RwLock<Option<Instant>>>,
}

impl SessionMetrics {
    pub fn record_chunk(&self, frames: usize, pruned: usize) {
        self.chunks_in.fetch_add(1, Ordering::Relaxed);
        self.frames_scored.fetch_add(frames as u64, Ordering::Relaxed);
        self.frames_pruned.fetch_add(pruned as u64, Ordering::Relaxed);
        if frames == 0 {
            self.buffering_chunks.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_push_error(&self) {
        self.push_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_result(&self, final_pass: bool) {
        if final_pass {
            self.final_results.fetch_add(1, Ordering::Relaxed);
        } else {
            self.partial_results.fetch_add(1, Ordering::Relaxed);
        }
        *self.last_result_time.write() = Some(Instant::now());
    }

    pub fn record_utterance(&self) {
        self.utterances.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_shared_across_clones() {
        let metrics = SessionMetrics::default();
        let view = metrics.clone();

        metrics.record_chunk(8, 2);
        metrics.record_chunk(0, 0);

        assert_eq!(view.chunks_in.load(Ordering::Relaxed), 2);
        assert_eq!(view.frames_scored.load(Ordering::Relaxed), 8);
        assert_eq!(view.frames_pruned.load(Ordering::Relaxed), 2);
        assert_eq!(view.buffering_chunks.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn results_update_last_event_time() {
        let metrics = SessionMetrics::default();
        assert!(metrics.last_result_time.read().is_none());
        metrics.record_result(false);
        assert!(metrics.last_result_time.read().is_some());
        assert_eq!(metrics.partial_results.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.final_results.load(Ordering::Relaxed), 0);
    }
}
