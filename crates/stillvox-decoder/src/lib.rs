//! Streaming decoder session layer for StillVox
//!
//! This crate owns the resource/session lifecycle and the streaming push
//! protocol of the decoder: a [`ModelResource`] holds the shared read-only
//! artifacts (search graph, word table, acoustic model), a [`DecodeSession`]
//! owns everything derived for one utterance, and the session's push/result
//! API drives audio chunks through inference and incremental search while
//! the current best hypothesis stays readable at any point.

pub mod adapter;
pub mod options;
pub mod resource;
pub mod session;

pub use adapter::{Adapted, CtcAdapter};
pub use options::{DecodeOptions, ResourcePaths};
pub use resource::{ModelResource, ResourceError};
pub use session::{DecodeError, DecodeSession, Push, UtteranceState};
