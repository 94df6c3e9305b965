//! Typed decoder configuration
//!
//! Both configs load from the line-oriented `key=value` format. Defaults
//! are applied first and only keys present in the file override them;
//! unknown keys are ignored so one file can feed several components.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stillvox_engine::{SearchOptions, TokenId};
use stillvox_foundation::{kv, ConfigError};
use tracing::info;

/// Locations of the three model artifacts a resource is built from.
///
/// A key absent from the file leaves its field empty; resource creation
/// reports that as a missing path rather than guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePaths {
    pub am_config_path: String,
    pub graph_path: String,
    pub words_table_path: String,
}

impl ResourcePaths {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut paths = Self::default();
        for (key, value) in kv::read_file(path)? {
            match key.as_str() {
                "am_config_path" => paths.am_config_path = value,
                "graph_path" => paths.graph_path = value,
                "words_table_path" => paths.words_table_path = value,
                _ => {}
            }
        }
        info!(
            target: "decode",
            am = %paths.am_config_path,
            graph = %paths.graph_path,
            words = %paths.words_table_path,
            "resource config loaded"
        );
        Ok(paths)
    }
}

/// Per-session decode options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Multiplier applied to every acoustic score before the search.
    pub acoustic_scale: f32,
    /// Carried for search engines that distinguish partial traceback; this
    /// layer does not consume it.
    pub allow_partial: bool,
    pub beam: f32,
    pub max_active: usize,
    pub min_active: usize,
    /// Subtracted from the blank token's score before scaling.
    pub minus_blank: f32,
    pub blank_id: TokenId,
    /// Skip frames the blank token dominates.
    pub ctc_prune: bool,
    /// Minimum non-blank posterior mass a frame needs to survive pruning.
    pub ctc_threshold: f32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            acoustic_scale: 3.0,
            allow_partial: true,
            beam: 15.0,
            max_active: usize::MAX,
            min_active: 20,
            minus_blank: 0.0,
            blank_id: 1,
            ctc_prune: false,
            ctc_threshold: 0.1,
        }
    }
}

impl DecodeOptions {
    /// Load options from a config file. Every malformed value is collected
    /// before the load fails, so one pass reports them all.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut options = Self::default();
        let mut errors = Vec::new();

        for (key, value) in kv::read_file(path)? {
            let failure = match key.as_str() {
                "acoustic_scale" => kv::parse_value(&key, &value, "a float")
                    .map(|v| options.acoustic_scale = v)
                    .err(),
                "allow_partial" => kv::parse_bool01(&key, &value)
                    .map(|v| options.allow_partial = v)
                    .err(),
                "beam" => kv::parse_value(&key, &value, "a float")
                    .map(|v| options.beam = v)
                    .err(),
                "max_active" => kv::parse_value(&key, &value, "an integer")
                    .map(|v| options.max_active = v)
                    .err(),
                "min_active" => kv::parse_value(&key, &value, "an integer")
                    .map(|v| options.min_active = v)
                    .err(),
                "minus_blank" => kv::parse_value(&key, &value, "a float")
                    .map(|v| options.minus_blank = v)
                    .err(),
                "blank_id" => kv::parse_value(&key, &value, "an integer")
                    .map(|v| options.blank_id = v)
                    .err(),
                "ctc_prune" => kv::parse_bool01(&key, &value)
                    .map(|v| options.ctc_prune = v)
                    .err(),
                "ctc_threshold" => kv::parse_value(&key, &value, "a float")
                    .map(|v| options.ctc_threshold = v)
                    .err(),
                _ => None,
            };
            if let Some(err) = failure {
                errors.push(err);
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                errors,
            });
        }

        info!(
            target: "decode",
            acoustic_scale = options.acoustic_scale,
            beam = options.beam,
            max_active = options.max_active,
            min_active = options.min_active,
            blank_id = options.blank_id,
            ctc_prune = options.ctc_prune,
            "decoder config loaded"
        );
        Ok(options)
    }

    /// The subset handed to the search engine when a session starts.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            beam: self.beam,
            max_active: self.max_active,
            min_active: self.min_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn decode_options_documented_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.acoustic_scale, 3.0);
        assert!(options.allow_partial);
        assert_eq!(options.beam, 15.0);
        assert_eq!(options.max_active, usize::MAX);
        assert_eq!(options.min_active, 20);
        assert_eq!(options.minus_blank, 0.0);
        assert_eq!(options.blank_id, 1);
        assert!(!options.ctc_prune);
        assert_eq!(options.ctc_threshold, 0.1);
    }

    #[test]
    fn file_overrides_only_present_keys() {
        let file = write_config("beam=9.5\nblank_id=0\nctc_prune=1\n");
        let options = DecodeOptions::load(file.path()).unwrap();
        assert_eq!(options.beam, 9.5);
        assert_eq!(options.blank_id, 0);
        assert!(options.ctc_prune);
        // untouched keys keep their defaults
        assert_eq!(options.acoustic_scale, 3.0);
        assert_eq!(options.min_active, 20);
    }

    #[test]
    fn duplicate_key_last_occurrence_wins() {
        let file = write_config("beam=10\nbeam=20\n");
        let options = DecodeOptions::load(file.path()).unwrap();
        assert_eq!(options.beam, 20.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let file = write_config("beam=9.0\nsome_future_key=yes\n");
        let options = DecodeOptions::load(file.path()).unwrap();
        assert_eq!(options.beam, 9.0);
    }

    #[test]
    fn malformed_values_are_collected_together() {
        let file = write_config("beam=wide\nmax_active=lots\nmin_active=5\n");
        let err = DecodeOptions::load(file.path()).unwrap_err();
        let errors = err.key_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].key, "beam");
        assert_eq!(errors[1].key, "max_active");
    }

    #[test]
    fn bools_are_zero_or_one() {
        let file = write_config("allow_partial=0\n");
        let options = DecodeOptions::load(file.path()).unwrap();
        assert!(!options.allow_partial);

        let file = write_config("allow_partial=true\n");
        assert!(DecodeOptions::load(file.path()).is_err());
    }

    #[test]
    fn resource_paths_absent_keys_stay_empty() {
        let file = write_config("graph_path=/data/graph.fst\nextra=ignored\n");
        let paths = ResourcePaths::load(file.path()).unwrap();
        assert_eq!(paths.graph_path, "/data/graph.fst");
        assert!(paths.am_config_path.is_empty());
        assert!(paths.words_table_path.is_empty());
    }

    #[test]
    fn missing_config_file_is_reported() {
        assert!(ResourcePaths::load(Path::new("/nonexistent/res.conf")).is_err());
        assert!(DecodeOptions::load(Path::new("/nonexistent/dec.conf")).is_err());
    }
}
