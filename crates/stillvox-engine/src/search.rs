//! Search-graph and lattice-search boundary
//!
//! The graph file format and the search algorithm both live behind these
//! traits. The decoder layer only ever loads a graph, starts a search over
//! it, advances the search with score blocks, and reads the current best
//! path.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stillvox_foundation::EngineError;

use crate::score::{ScoreBlock, TokenId};

/// Pruning options handed to the search engine when a session starts a
/// search over the shared graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub beam: f32,
    pub max_active: usize,
    pub min_active: usize,
}

/// Loads a search graph from disk. The file format is the loader's concern.
pub trait GraphLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn SearchGraph>, EngineError>;
}

/// A loaded, immutable search graph, shared read-only by many sessions.
pub trait SearchGraph: Send + Sync {
    /// Start a fresh search over this graph. The returned instance is owned
    /// exclusively by one decode session.
    fn start_search(&self, options: &SearchOptions) -> Box<dyn LatticeSearch>;
}

/// One live hypothesis lattice.
pub trait LatticeSearch: Send {
    /// Reset the lattice to its initial state.
    fn begin(&mut self);

    /// Consume one block of per-frame scores and move decoding forward.
    fn advance(&mut self, scores: &ScoreBlock);

    /// Current best token-id path. Cheap and non-destructive; valid at any
    /// point of the utterance, any number of times.
    fn best_path(&self) -> Vec<TokenId>;
}
