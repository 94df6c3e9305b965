//! Foundation types for StillVox
//!
//! This crate holds the pieces every other StillVox crate leans on: the
//! error taxonomy shared across the decoder boundary and the line-oriented
//! `key=value` config-file reader used by resource and session configs.

pub mod error;
pub mod kv;

pub use error::*;
pub use kv::*;
