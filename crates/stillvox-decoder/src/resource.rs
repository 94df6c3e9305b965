//! Shared model resource
//!
//! A [`ModelResource`] owns the read-only artifacts of one model: the
//! search graph, the word table, and the loaded acoustic model. It is
//! created once and shared (`Arc`) by any number of concurrently-running
//! decode sessions; release is `Drop`, in the reverse of acquisition.

use std::path::Path;
use std::sync::Arc;

use stillvox_engine::{AcousticEngine, AcousticModel, GraphLoader, SearchGraph, WordTable};
use stillvox_foundation::EngineError;
use stillvox_telemetry::{DecodeEvent, EventSink, NullSink};
use thiserror::Error;
use tracing::info;

use crate::options::ResourcePaths;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource config is missing {key}")]
    MissingPath { key: &'static str },

    #[error("search graph: {0}")]
    Graph(#[source] EngineError),

    #[error("word table {path:?}: {source}")]
    WordTable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An empty table would render every hypothesis as out-of-range ids, so
    /// it fails creation instead of surfacing later as a decode error.
    #[error("word table {path:?} is empty")]
    EmptyWordTable { path: String },

    #[error("acoustic model: {0}")]
    Model(#[source] EngineError),
}

pub struct ModelResource {
    graph: Arc<dyn SearchGraph>,
    words: Arc<WordTable>,
    model: Arc<dyn AcousticModel>,
}

impl std::fmt::Debug for ModelResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelResource").finish_non_exhaustive()
    }
}

impl ModelResource {
    /// Load graph, word table, and acoustic model, in that order, aborting
    /// on the first failure with nothing further acquired.
    pub fn create(
        paths: &ResourcePaths,
        loader: &dyn GraphLoader,
        engine: &dyn AcousticEngine,
    ) -> Result<Self, ResourceError> {
        Self::create_with_sink(paths, loader, engine, &NullSink)
    }

    pub fn create_with_sink(
        paths: &ResourcePaths,
        loader: &dyn GraphLoader,
        engine: &dyn AcousticEngine,
        sink: &dyn EventSink,
    ) -> Result<Self, ResourceError> {
        for (key, value) in [
            ("graph_path", &paths.graph_path),
            ("words_table_path", &paths.words_table_path),
            ("am_config_path", &paths.am_config_path),
        ] {
            if value.is_empty() {
                return Err(ResourceError::MissingPath { key });
            }
        }

        let graph = loader
            .load(Path::new(&paths.graph_path))
            .map_err(ResourceError::Graph)?;

        let words =
            WordTable::load(Path::new(&paths.words_table_path)).map_err(|source| {
                ResourceError::WordTable {
                    path: paths.words_table_path.clone(),
                    source,
                }
            })?;
        if words.is_empty() {
            return Err(ResourceError::EmptyWordTable {
                path: paths.words_table_path.clone(),
            });
        }

        let model = engine
            .load_model(Path::new(&paths.am_config_path))
            .map_err(ResourceError::Model)?;

        info!(
            target: "decode",
            graph = %paths.graph_path,
            words = words.len(),
            "model resource created"
        );
        sink.emit(DecodeEvent::ResourceCreated {
            graph_path: paths.graph_path.clone(),
            words: words.len(),
        });

        Ok(Self {
            graph,
            words: Arc::new(words),
            model,
        })
    }

    pub fn graph(&self) -> Arc<dyn SearchGraph> {
        Arc::clone(&self.graph)
    }

    pub fn model(&self) -> Arc<dyn AcousticModel> {
        Arc::clone(&self.model)
    }

    /// Shared, immutable view of the word table.
    pub fn words(&self) -> Arc<WordTable> {
        Arc::clone(&self.words)
    }
}
