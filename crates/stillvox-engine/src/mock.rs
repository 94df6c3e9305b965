//! Mock engine and search implementations for testing
//!
//! Configurable stand-ins for every boundary trait. The acoustic mock can
//! replay a scripted sequence of outcomes or derive deterministic one-hot
//! frames from the audio content itself; shared counters record loads,
//! handle lifetimes, and the first/last flags the decoder tagged each chunk
//! with, so tests assert on behavior instead of parsing log text.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use stillvox_foundation::EngineError;

use crate::acoustic::{AcousticEngine, AcousticHandle, AcousticModel, AudioChunk, ScoreOutcome};
use crate::score::{ScoreBlock, TokenId};
use crate::search::{GraphLoader, LatticeSearch, SearchGraph, SearchOptions};

/// One pre-scripted answer for `score_chunk`.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Scores(Vec<Vec<f32>>),
    Buffering,
    Error(String),
}

/// Shared observation points for a mock engine and everything it creates.
#[derive(Debug, Default)]
pub struct MockCounters {
    pub models_loaded: AtomicUsize,
    pub models_freed: AtomicUsize,
    pub handles_created: AtomicUsize,
    pub handles_freed: AtomicUsize,
    pub chunks_scored: AtomicUsize,
    /// `(first, last)` flags as seen by the engine, in arrival order.
    pub chunk_flags: Mutex<Vec<(bool, bool)>>,
}

impl MockCounters {
    pub fn flags(&self) -> Vec<(bool, bool)> {
        self.chunk_flags.lock().unwrap().clone()
    }
}

/// Configuration for the mock acoustic engine.
#[derive(Debug, Clone)]
pub struct MockEngineConfig {
    /// Fail `load_model` with this message.
    pub fail_load: Option<String>,
    /// Fail `create_handle` with this message.
    pub fail_create_handle: Option<String>,
    /// Outcomes replayed before deterministic scoring kicks in. Each handle
    /// gets its own copy of the script.
    pub script: Vec<ScriptedOutcome>,
    /// Samples consumed per emitted frame in deterministic mode.
    pub samples_per_frame: usize,
    /// Vocabulary width of deterministic frames.
    pub tokens: usize,
}

impl Default for MockEngineConfig {
    fn default() -> Self {
        Self {
            fail_load: None,
            fail_create_handle: None,
            script: Vec::new(),
            samples_per_frame: 4,
            tokens: 3,
        }
    }
}

/// Mock inference engine.
#[derive(Debug, Default)]
pub struct MockAcousticEngine {
    config: MockEngineConfig,
    counters: Arc<MockCounters>,
}

impl MockAcousticEngine {
    pub fn new(config: MockEngineConfig) -> Self {
        Self {
            config,
            counters: Arc::new(MockCounters::default()),
        }
    }

    /// Engine whose handles replay `script`, then score deterministically.
    pub fn with_script(script: Vec<ScriptedOutcome>) -> Self {
        Self::new(MockEngineConfig {
            script,
            ..Default::default()
        })
    }

    pub fn counters(&self) -> Arc<MockCounters> {
        Arc::clone(&self.counters)
    }
}

impl AcousticEngine for MockAcousticEngine {
    fn load_model(&self, _config_path: &Path) -> Result<Arc<dyn AcousticModel>, EngineError> {
        if let Some(msg) = &self.config.fail_load {
            return Err(EngineError::ModelLoad(msg.clone()));
        }
        self.counters.models_loaded.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockModel {
            config: self.config.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

#[derive(Debug)]
struct MockModel {
    config: MockEngineConfig,
    counters: Arc<MockCounters>,
}

impl AcousticModel for MockModel {
    fn create_handle(&self) -> Result<Box<dyn AcousticHandle>, EngineError> {
        if let Some(msg) = &self.config.fail_create_handle {
            return Err(EngineError::HandleCreate(msg.clone()));
        }
        self.counters.handles_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockHandle {
            script: self.config.script.iter().cloned().collect(),
            samples_per_frame: self.config.samples_per_frame,
            tokens: self.config.tokens,
            pending: Vec::new(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

impl Drop for MockModel {
    fn drop(&mut self) {
        self.counters.models_freed.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockHandle {
    script: VecDeque<ScriptedOutcome>,
    samples_per_frame: usize,
    tokens: usize,
    pending: Vec<i16>,
    counters: Arc<MockCounters>,
}

impl MockHandle {
    /// One-hot frame whose hot token is a checksum of the window. The same
    /// audio always maps to the same path no matter how it was chunked.
    fn frame_for(&self, window: &[i16]) -> Vec<f32> {
        let sum: u64 = window.iter().map(|&s| s.unsigned_abs() as u64).sum();
        let hot = (sum % self.tokens as u64) as usize;
        let mut frame = vec![0.0; self.tokens];
        frame[hot] = 1.0;
        frame
    }
}

impl AcousticHandle for MockHandle {
    fn score_chunk(&mut self, chunk: AudioChunk<'_>) -> Result<ScoreOutcome, EngineError> {
        self.counters.chunks_scored.fetch_add(1, Ordering::SeqCst);
        self.counters
            .chunk_flags
            .lock()
            .unwrap()
            .push((chunk.first, chunk.last));

        if let Some(step) = self.script.pop_front() {
            return match step {
                ScriptedOutcome::Scores(rows) => Ok(ScoreOutcome::Scores(ScoreBlock::from_rows(&rows))),
                ScriptedOutcome::Buffering => Ok(ScoreOutcome::Buffering),
                ScriptedOutcome::Error(msg) => Err(EngineError::Scoring(msg)),
            };
        }

        self.pending.extend_from_slice(chunk.samples);

        let mut rows = Vec::new();
        while self.pending.len() >= self.samples_per_frame {
            let window: Vec<i16> = self.pending.drain(..self.samples_per_frame).collect();
            rows.push(self.frame_for(&window));
        }
        // A trailing partial window only ever scores at utterance end.
        if chunk.last && !self.pending.is_empty() {
            let window: Vec<i16> = self.pending.drain(..).collect();
            rows.push(self.frame_for(&window));
        }

        if rows.is_empty() {
            Ok(ScoreOutcome::Buffering)
        } else {
            Ok(ScoreOutcome::Scores(ScoreBlock::from_rows(&rows)))
        }
    }

    fn reset(&mut self) {
        self.pending.clear();
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.counters.handles_freed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock graph loader handing out one shared graph.
#[derive(Debug)]
pub struct MockGraphLoader {
    graph: Arc<MockGraph>,
    fail: Option<String>,
    pub loads: AtomicUsize,
}

impl MockGraphLoader {
    pub fn new(graph: MockGraph) -> Self {
        Self {
            graph: Arc::new(graph),
            fail: None,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            graph: Arc::new(MockGraph::default()),
            fail: Some(message.into()),
            loads: AtomicUsize::new(0),
        }
    }
}

impl GraphLoader for MockGraphLoader {
    fn load(&self, _path: &Path) -> Result<Arc<dyn SearchGraph>, EngineError> {
        if let Some(msg) = &self.fail {
            return Err(EngineError::GraphLoad(msg.clone()));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.graph.clone() as Arc<dyn SearchGraph>)
    }
}

/// Mock graph whose searches run greedy CTC: per-frame argmax, consecutive
/// repeats collapsed, the blank token dropped.
#[derive(Debug, Clone, Copy)]
pub struct MockGraph {
    pub blank: TokenId,
}

impl Default for MockGraph {
    fn default() -> Self {
        Self { blank: 0 }
    }
}

impl SearchGraph for MockGraph {
    fn start_search(&self, options: &SearchOptions) -> Box<dyn LatticeSearch> {
        Box::new(GreedySearch {
            blank: self.blank,
            _options: *options,
            prev: None,
            path: Vec::new(),
        })
    }
}

struct GreedySearch {
    blank: TokenId,
    _options: SearchOptions,
    prev: Option<TokenId>,
    path: Vec<TokenId>,
}

impl LatticeSearch for GreedySearch {
    fn begin(&mut self) {
        self.prev = None;
        self.path.clear();
    }

    fn advance(&mut self, scores: &ScoreBlock) {
        for frame in scores.iter_frames() {
            let Some(token) = ScoreBlock::argmax(frame) else {
                continue;
            };
            if self.prev != Some(token) && token != self.blank {
                self.path.push(token);
            }
            self.prev = Some(token);
        }
    }

    fn best_path(&self) -> Vec<TokenId> {
        self.path.clone()
    }
}
