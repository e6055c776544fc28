// rust/builder-core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {

    #[error("Unsupported dataset split: '{split}' (expected train, dev or test)")]
    UnsupportedSplit {
        split: String,
    },

    #[error("Option '{left}' has {left_len} entries but '{right}' has {right_len}")]
    ShapeMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    #[error("Missing required option '{key}'")]
    MissingOption {
        key: String,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Storage error at '{path}': {message}")]
    Storage {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Dataset '{name}' error: {message}")]
    Dataset {
        name: String,
        message: String,
    },

    #[error("No dataset builder registered under '{name}'")]
    UnknownBuilder {
        name: String,
    },

    #[error("Dataset has not been loaded yet")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, BuilderError>;

// Convenience constructors
impl BuilderError {

    pub fn unsupported_split(split: impl Into<String>) -> Self {
        Self::UnsupportedSplit {
            split: split.into(),
        }
    }

    pub fn shape_mismatch(
        left: impl Into<String>,
        left_len: usize,
        right: impl Into<String>,
        right_len: usize,
    ) -> Self {
        Self::ShapeMismatch {
            left: left.into(),
            left_len,
            right: right.into(),
            right_len,
        }
    }

    pub fn missing_option(key: impl Into<String>) -> Self {
        Self::MissingOption { key: key.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn storage(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Storage {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn storage_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Storage {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn dataset(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dataset {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn unknown_builder(name: impl Into<String>) -> Self {
        Self::UnknownBuilder { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_names_both_options() {
        let err = BuilderError::shape_mismatch("imdb_file_train", 2, "image_feat_train", 1);
        let msg = err.to_string();
        assert!(msg.contains("imdb_file_train"));
        assert!(msg.contains("image_feat_train"));
        assert!(msg.contains('2'));
        assert!(msg.contains('1'));
    }

    #[test]
    fn test_unsupported_split_message() {
        let err = BuilderError::unsupported_split("bogus");
        assert!(matches!(err, BuilderError::UnsupportedSplit { ref split } if split == "bogus"));
        assert!(err.to_string().contains("'bogus'"));
    }

    #[test]
    fn test_config_with_source_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = BuilderError::config_with_source("bad config", io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
