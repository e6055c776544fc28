// rust/builder-core/src/dataset/vocab.rs

//! Word lists backing the question and answer vocabularies.
//!
//! A vocabulary file holds one entry per line, trimmed of surrounding
//! whitespace. Builders only need the entry count, which sizes the model's
//! embedding and answer layers.

use std::path::Path;

use crate::error::{BuilderError, Result};

#[derive(Debug, Clone, Default)]
pub struct VocabDict {
    word_list: Vec<String>,
}

impl VocabDict {
    /// Loads a vocabulary file.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BuilderError::storage_with_source(path, "failed to read vocabulary file", e)
        })?;
        Ok(Self::from_words(content.lines().map(str::trim)))
    }

    /// Builds a vocabulary from words in index order.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            word_list: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of entries, counting repeats.
    pub fn num_vocab(&self) -> usize {
        self.word_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_num_vocab_counts_repeats() {
        let vocab = VocabDict::from_words(["<unk>", "a", "b", "a"]);
        assert_eq!(vocab.num_vocab(), 4);
        assert_eq!(VocabDict::default().num_vocab(), 0);
    }

    #[test]
    fn test_from_file_counts_lines() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<unk>\n  yes \r\nno\n").unwrap();

        let vocab = VocabDict::from_file(file.path()).unwrap();
        assert_eq!(vocab.num_vocab(), 3);
    }

    #[test]
    fn test_from_file_not_found() {
        let result = VocabDict::from_file("/nonexistent/vocab.txt");
        assert!(matches!(result, Err(BuilderError::Storage { .. })));
    }
}
