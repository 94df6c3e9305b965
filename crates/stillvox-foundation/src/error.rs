use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading or interpreting a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more values failed to parse. Every bad key is collected before
    /// the load fails, so callers see the whole picture in one pass.
    #[error("config {path:?} has {} invalid entries", .errors.len())]
    Invalid {
        path: PathBuf,
        errors: Vec<KeyParseError>,
    },
}

impl ConfigError {
    /// The per-key failures behind an `Invalid` error, empty otherwise.
    pub fn key_errors(&self) -> &[KeyParseError] {
        match self {
            ConfigError::Invalid { errors, .. } => errors,
            ConfigError::Io { .. } => &[],
        }
    }
}

/// A single `key=value` entry that could not be interpreted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{key}={value}: expected {expected}")]
pub struct KeyParseError {
    pub key: String,
    pub value: String,
    pub expected: &'static str,
}

/// Error reported by an engine implementation across the inference or
/// search boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("handle creation failed: {0}")]
    HandleCreate(String),

    #[error("scoring failed: {0}")]
    Scoring(String),

    #[error("graph load failed: {0}")]
    GraphLoad(String),
}
