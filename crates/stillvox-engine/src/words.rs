//! Word table: token id to text

use std::io;
use std::path::Path;

use crate::score::TokenId;

/// Ordered token vocabulary. The line index in the words file (0-based) is
/// the token id the search graph emits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordTable {
    entries: Vec<String>,
}

impl WordTable {
    /// Load a table from a one-token-per-line file.
    ///
    /// Tokens are whitespace-trimmed. Blank lines are skipped; keeping them
    /// would silently shift every later token id.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_tokens(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        ))
    }

    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            entries: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, id: TokenId) -> Option<&str> {
        self.entries.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_line_per_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<blank>\nhello\nworld\n").unwrap();

        let table = WordTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("<blank>"));
        assert_eq!(table.get(2), Some("world"));
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn skips_blank_lines_without_shifting_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<blank>\n\nhello\n").unwrap();

        let table = WordTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some("hello"));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(WordTable::load(Path::new("/nonexistent/words.txt")).is_err());
    }
}
