//! Line-oriented `key=value` config reader
//!
//! The on-disk format shared by the resource and session configs: blank
//! lines and lines starting with `#` are skipped, each remaining line is
//! `key=value` with both sides whitespace-trimmed. Duplicate keys are kept
//! in file order so consumers fold them last-occurrence-wins.

use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, KeyParseError};

/// Read a config file into `(key, value)` pairs.
///
/// Structural problems (a meaningful line with no `=`) are collected across
/// the whole file and reported together as `ConfigError::Invalid`.
pub fn read_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut pairs = Vec::new();
    let mut errors = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => pairs.push((key.trim().to_string(), value.trim().to_string())),
            None => errors.push(KeyParseError {
                key: line.to_string(),
                value: String::new(),
                expected: "key=value",
            }),
        }
    }

    if errors.is_empty() {
        Ok(pairs)
    } else {
        Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            errors,
        })
    }
}

/// Parse one value with its key attached to any failure.
pub fn parse_value<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, KeyParseError> {
    value.parse().map_err(|_| KeyParseError {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

/// Booleans are encoded as `0`/`1` in decoder configs.
pub fn parse_bool01(key: &str, value: &str) -> Result<bool, KeyParseError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(KeyParseError {
            key: key.to_string(),
            value: value.to_string(),
            expected: "0 or 1",
        }),
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
    fn skips_blanks_and_comments() {
        let file = write_config("\n# a comment\n  \nbeam = 12.5\n");
        let pairs = read_file(file.path()).unwrap();
        assert_eq!(pairs, vec![("beam".to_string(), "12.5".to_string())]);
    }

    #[test]
    fn trims_both_sides() {
        let file = write_config("  graph_path =  /data/graph.fst  \n");
        let pairs = read_file(file.path()).unwrap();
        assert_eq!(pairs[0].0, "graph_path");
        assert_eq!(pairs[0].1, "/data/graph.fst");
    }

    #[test]
    fn keeps_duplicates_in_file_order() {
        let file = write_config("beam=10\nbeam=20\n");
        let pairs = read_file(file.path()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].1, "20");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_file(Path::new("/nonexistent/decode.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn line_without_equals_is_collected() {
        let file = write_config("beam=10\nnot a pair\nalso bad\n");
        let err = read_file(file.path()).unwrap_err();
        assert_eq!(err.key_errors().len(), 2);
    }

    #[test]
    fn parse_bool01_rejects_words() {
        assert!(parse_bool01("ctc_prune", "1").unwrap());
        assert!(!parse_bool01("ctc_prune", "0").unwrap());
        assert!(parse_bool01("ctc_prune", "true").is_err());
    }
}
