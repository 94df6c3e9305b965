//! Streaming decode session
//!
//! One [`DecodeSession`] decodes one utterance at a time: chunks go in
//! through [`DecodeSession::push_chunk`], the current best hypothesis comes
//! out of [`DecodeSession::result`] at any point. The session owns its
//! inference handle, search instance, and adapter; the shared graph and
//! model stay with the [`ModelResource`](crate::ModelResource) it was
//! created from.
//!
//! The session is driven by one logical caller; `&mut self` on the mutating
//! calls makes concurrent use a compile error rather than a data race.

use std::sync::Arc;

use stillvox_engine::{AudioChunk, LatticeSearch, TokenId, WordTable};
use stillvox_foundation::EngineError;
use stillvox_telemetry::{DecodeEvent, EventSink, NullSink, SessionMetrics};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapter::{Adapted, CtcAdapter};
use crate::options::DecodeOptions;
use crate::resource::ModelResource;

/// Where the session is within the current utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceState {
    /// No chunk accepted since the last `begin_utterance`.
    AwaitingFirst,
    /// Mid-utterance.
    Streaming,
    /// A `last` chunk was accepted; the utterance is closed.
    Finished,
    /// The engine failed mid-utterance. The adapter's buffer may already
    /// hold the failed chunk, so no more audio is accepted until
    /// `begin_utterance` clears it.
    Poisoned,
}

/// Successful outcome of one push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    /// The search consumed `frames` frames (0 when pruning dropped all).
    Advanced { frames: usize },
    /// The engine is buffering; the search did not move.
    Buffering,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("audio chunk is empty")]
    EmptyChunk,

    #[error("utterance already finished, call begin_utterance first")]
    UtteranceFinished,

    #[error("session poisoned by an engine error, call begin_utterance first")]
    SessionPoisoned,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("token id {id} outside word table of {table_len} entries")]
    TokenOutOfRange { id: TokenId, table_len: usize },
}

impl DecodeError {
    fn code(&self) -> &'static str {
        match self {
            DecodeError::EmptyChunk => "empty_chunk",
            DecodeError::UtteranceFinished => "utterance_finished",
            DecodeError::SessionPoisoned => "session_poisoned",
            DecodeError::Engine(_) => "engine",
            DecodeError::TokenOutOfRange { .. } => "token_out_of_range",
        }
    }
}

pub struct DecodeSession {
    options: DecodeOptions,
    adapter: CtcAdapter,
    search: Box<dyn LatticeSearch>,
    words: Arc<WordTable>,
    state: UtteranceState,
    metrics: SessionMetrics,
    sink: Arc<dyn EventSink>,
}

impl DecodeSession {
    /// Create a session over a shared resource. The resource outlives the
    /// session only logically; everything the session needs is cloned or
    /// derived here, so the resource may be dropped first.
    pub fn create(resource: &ModelResource, options: DecodeOptions) -> Result<Self, DecodeError> {
        Self::create_with_sink(resource, options, Arc::new(NullSink))
    }

    pub fn create_with_sink(
        resource: &ModelResource,
        options: DecodeOptions,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, DecodeError> {
        let handle = resource.model().create_handle()?;
        let mut search = resource.graph().start_search(&options.search_options());
        search.begin();
        let adapter = CtcAdapter::new(handle, &options);

        info!(
            target: "decode",
            beam = options.beam,
            acoustic_scale = options.acoustic_scale,
            "decode session created"
        );
        sink.emit(DecodeEvent::SessionCreated);

        Ok(Self {
            options,
            adapter,
            search,
            words: resource.words(),
            state: UtteranceState::AwaitingFirst,
            metrics: SessionMetrics::default(),
            sink,
        })
    }

    /// Start a new utterance, abandoning any in-flight state: the lattice
    /// returns to its initial state, the adapter drops buffered audio, and
    /// the next accepted chunk is tagged `first`.
    pub fn begin_utterance(&mut self) {
        self.search.begin();
        self.adapter.reset();
        self.state = UtteranceState::AwaitingFirst;
        self.metrics.record_utterance();
        debug!(target: "decode", "utterance started");
        self.sink.emit(DecodeEvent::UtteranceStarted);
    }

    /// Feed one chunk of audio, in temporal order. `last` closes the
    /// utterance; a single-chunk utterance is simply first and last at once.
    pub fn push_chunk(&mut self, samples: &[i16], last: bool) -> Result<Push, DecodeError> {
        if samples.is_empty() {
            return self.refuse(DecodeError::EmptyChunk);
        }
        match self.state {
            UtteranceState::Finished => return self.refuse(DecodeError::UtteranceFinished),
            UtteranceState::Poisoned => return self.refuse(DecodeError::SessionPoisoned),
            UtteranceState::AwaitingFirst | UtteranceState::Streaming => {}
        }

        let first = self.state == UtteranceState::AwaitingFirst;
        let chunk = AudioChunk {
            samples,
            first,
            last,
        };

        match self.adapter.score_chunk(chunk) {
            Ok(Adapted::Scores { block, pruned }) => {
                let frames = block.frames();
                if !block.is_empty() {
                    self.search.advance(&block);
                }
                self.finish_push(first, last, frames, pruned);
                Ok(Push::Advanced { frames })
            }
            Ok(Adapted::Buffering) => {
                self.finish_push(first, last, 0, 0);
                Ok(Push::Buffering)
            }
            Err(err) => {
                self.state = UtteranceState::Poisoned;
                warn!(target: "decode", error = %err, "inference failed, utterance poisoned");
                self.metrics.record_push_error();
                self.sink.emit(DecodeEvent::PushFailed { code: "engine" });
                Err(DecodeError::Engine(err))
            }
        }
    }

    /// Render the current best hypothesis as text. Cheap, non-destructive,
    /// valid in every state, any number of times. `final_pass` affects only
    /// labeling of the emitted event and log line.
    pub fn result(&self, final_pass: bool) -> Result<String, DecodeError> {
        let path = self.search.best_path();
        let mut text = String::new();
        for &id in &path {
            let word = self
                .words
                .get(id)
                .ok_or(DecodeError::TokenOutOfRange {
                    id,
                    table_len: self.words.len(),
                })?;
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }

        self.metrics.record_result(final_pass);
        debug!(
            target: "decode",
            final_pass,
            tokens = path.len(),
            "result read"
        );
        self.sink.emit(DecodeEvent::ResultEmitted {
            final_pass,
            tokens: path.len(),
        });
        Ok(text)
    }

    pub fn state(&self) -> UtteranceState {
        self.state
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Shared counters; clones observe the same underlying atomics.
    pub fn metrics(&self) -> SessionMetrics {
        self.metrics.clone()
    }

    fn finish_push(&mut self, first: bool, last: bool, frames: usize, pruned: usize) {
        self.state = if last {
            UtteranceState::Finished
        } else {
            UtteranceState::Streaming
        };
        self.metrics.record_chunk(frames, pruned);
        debug!(target: "decode", first, last, frames, "chunk pushed");
        self.sink.emit(DecodeEvent::ChunkPushed { first, last, frames });
    }

    fn refuse(&self, err: DecodeError) -> Result<Push, DecodeError> {
        self.metrics.record_push_error();
        self.sink.emit(DecodeEvent::PushFailed { code: err.code() });
        Err(err)
    }
}
