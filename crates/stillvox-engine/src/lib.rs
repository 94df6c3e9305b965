//! Engine boundary traits for StillVox
//!
//! The decoder layer never talks to a concrete inference engine or graph
//! search directly. This crate defines the seams: the acoustic-model
//! inference boundary, the search-graph / lattice-search boundary, the
//! per-frame score matrix exchanged across them, and the word table that
//! turns token ids back into text.
//!
//! The `mock` module ships configurable in-tree implementations of every
//! trait so the decoder can be exercised without a real model on disk.

pub mod acoustic;
pub mod mock;
pub mod score;
pub mod search;
pub mod words;

pub use acoustic::{AcousticEngine, AcousticHandle, AcousticModel, AudioChunk, ScoreOutcome};
pub use score::{ScoreBlock, TokenId};
pub use search::{GraphLoader, LatticeSearch, SearchGraph, SearchOptions};
pub use words::WordTable;
