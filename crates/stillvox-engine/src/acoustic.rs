//! Acoustic-model inference boundary
//!
//! A concrete inference engine (ONNX runtime, Kaldi nnet3, a remote
//! scorer) implements these three traits. The decoder layer owns the
//! lifecycle: one model per `ModelResource`, one handle per decode session,
//! release through `Drop`.

use std::path::Path;
use std::sync::Arc;

use stillvox_foundation::EngineError;

use crate::score::ScoreBlock;

/// One audio chunk tagged with its position in the utterance.
///
/// `first` and `last` may both be true for a single-chunk utterance.
#[derive(Debug, Clone, Copy)]
pub struct AudioChunk<'a> {
    /// 16 kHz mono S16LE PCM samples.
    pub samples: &'a [i16],
    pub first: bool,
    pub last: bool,
}

/// Outcome of scoring one chunk. The contract is a closed tri-state: scores
/// ready, still buffering, or `Err(EngineError)` from the call itself.
#[derive(Debug)]
pub enum ScoreOutcome {
    /// Per-frame posteriors ready for the search engine.
    Scores(ScoreBlock),
    /// The engine needs more audio context before it can emit frames.
    Buffering,
}

/// Entry point of an inference engine: turns a model config path into a
/// loaded, shareable model.
pub trait AcousticEngine: Send + Sync {
    fn load_model(&self, config_path: &Path) -> Result<Arc<dyn AcousticModel>, EngineError>;
}

/// A loaded acoustic model, shared read-only by many sessions.
pub trait AcousticModel: Send + Sync {
    /// Create a per-session inference handle.
    ///
    /// Implementations must support concurrent calls against one shared
    /// model; the decoder layer relies on it when sessions are created from
    /// different threads.
    fn create_handle(&self) -> Result<Box<dyn AcousticHandle>, EngineError>;
}

/// Per-session inference state. Owned exclusively by one decode session and
/// driven by one logical caller; dropping the handle releases it.
pub trait AcousticHandle: Send {
    fn score_chunk(&mut self, chunk: AudioChunk<'_>) -> Result<ScoreOutcome, EngineError>;

    /// Discard any buffered audio so the handle can start a new utterance.
    fn reset(&mut self);
}
