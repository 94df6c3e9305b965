//! Per-frame score matrix exchanged between the acoustic engine and the
//! lattice search.

/// Identifier of one token in the word table and the search graph.
pub type TokenId = u32;

/// Dense frames x tokens matrix of per-frame token scores.
///
/// Engines emit posteriors in `[0, 1]` per frame; the decoder's adapter may
/// rescale them before the search sees the block.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBlock {
    tokens: usize,
    data: Vec<f32>,
}

impl ScoreBlock {
    /// An empty block for `tokens` output tokens per frame.
    pub fn new(tokens: usize) -> Self {
        Self {
            tokens,
            data: Vec::new(),
        }
    }

    /// Build a block from complete frame rows. All rows must share a width.
    pub fn from_rows(rows: &[Vec<f32>]) -> Self {
        let tokens = rows.first().map(Vec::len).unwrap_or(0);
        let mut block = Self::new(tokens);
        for row in rows {
            block.push_frame(row);
        }
        block
    }

    /// Append one frame of scores. Panics if the width does not match; a
    /// mismatched frame is a bug in the producing engine, not a runtime
    /// condition.
    pub fn push_frame(&mut self, frame: &[f32]) {
        assert_eq!(frame.len(), self.tokens, "frame width mismatch");
        self.data.extend_from_slice(frame);
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }

    pub fn frames(&self) -> usize {
        if self.tokens == 0 {
            0
        } else {
            self.data.len() / self.tokens
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn frame(&self, index: usize) -> &[f32] {
        let start = index * self.tokens;
        &self.data[start..start + self.tokens]
    }

    pub fn iter_frames(&self) -> impl Iterator<Item = &[f32]> {
        // max(1) keeps a zero-width block iterable as zero frames
        self.data.chunks_exact(self.tokens.max(1))
    }

    /// Index of the highest-scoring token in one frame.
    pub fn argmax(frame: &[f32]) -> Option<TokenId> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &score) in frame.iter().enumerate() {
            match best {
                Some((_, s)) if s >= score => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i as TokenId)
    }
}
