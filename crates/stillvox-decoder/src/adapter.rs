//! CTC score adapter
//!
//! Sits between the per-session inference handle and the lattice search.
//! The engine emits raw per-frame posteriors; the adapter applies the
//! session's CTC options (blank pruning, blank bias, acoustic scaling)
//! before the search ever sees a frame. Options change path probabilities
//! only; they never change which tokens exist.

use stillvox_engine::{AcousticHandle, AudioChunk, ScoreBlock, ScoreOutcome};
use stillvox_foundation::EngineError;

use crate::options::DecodeOptions;

/// Outcome of scoring one chunk, after option transforms.
#[derive(Debug)]
pub enum Adapted {
    /// Transformed scores for the search. The block is empty when pruning
    /// dropped every frame of the chunk.
    Scores { block: ScoreBlock, pruned: usize },
    /// The engine is still buffering audio context.
    Buffering,
}

pub struct CtcAdapter {
    handle: Box<dyn AcousticHandle>,
    acoustic_scale: f32,
    blank_id: usize,
    minus_blank: f32,
    ctc_prune: bool,
    ctc_threshold: f32,
}

impl CtcAdapter {
    pub fn new(handle: Box<dyn AcousticHandle>, options: &DecodeOptions) -> Self {
        Self {
            handle,
            acoustic_scale: options.acoustic_scale,
            blank_id: options.blank_id as usize,
            minus_blank: options.minus_blank,
            ctc_prune: options.ctc_prune,
            ctc_threshold: options.ctc_threshold,
        }
    }

    pub fn score_chunk(&mut self, chunk: AudioChunk<'_>) -> Result<Adapted, EngineError> {
        match self.handle.score_chunk(chunk)? {
            ScoreOutcome::Buffering => Ok(Adapted::Buffering),
            ScoreOutcome::Scores(raw) => Ok(self.transform(raw)),
        }
    }

    /// Discard buffered audio so the next chunk starts a fresh utterance.
    pub fn reset(&mut self) {
        self.handle.reset();
    }

    fn transform(&self, raw: ScoreBlock) -> Adapted {
        let mut block = ScoreBlock::new(raw.tokens());
        let mut pruned = 0;

        for frame in raw.iter_frames() {
            let blank_posterior = frame.get(self.blank_id).copied().unwrap_or(0.0);
            if self.ctc_prune && 1.0 - blank_posterior < self.ctc_threshold {
                pruned += 1;
                continue;
            }

            let mut row = frame.to_vec();
            if let Some(score) = row.get_mut(self.blank_id) {
                *score -= self.minus_blank;
            }
            for score in &mut row {
                *score *= self.acoustic_scale;
            }
            block.push_frame(&row);
        }

        Adapted::Scores { block, pruned }
    }
}
