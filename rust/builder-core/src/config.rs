// rust/builder-core/src/config.rs

//! Configuration for dataset builders.
//!
//! This module provides the typed option bundle consumed by the builders,
//! parsed from TOML files, with environment variable overrides and a single
//! validation point for required options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{BuilderError, Result};

/// Default cap on question length in tokens.
pub const DEFAULT_QUESTION_MAX_LEN: usize = 26;

/// Default cap on layout length, applied only when a layout vocabulary is set.
pub const DEFAULT_LAYOUT_MAX_LEN: usize = 13;

/// Dataset split selected by `dataset_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }

    /// Option names holding the index files and the feature directories
    /// for this split.
    pub fn option_keys(&self) -> (&'static str, &'static str) {
        match self {
            Split::Train => ("imdb_file_train", "image_feat_train"),
            Split::Dev => ("imdb_file_val", "image_feat_val"),
            Split::Test => ("imdb_file_test", "image_feat_test"),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Split::Train),
            "dev" => Ok(Split::Dev),
            "test" => Ok(Split::Test),
            other => Err(BuilderError::unsupported_split(other)),
        }
    }
}

/// Options recognised by the VQA dataset builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    // Split tag: "train", "dev" or "test". Required; parsed at load time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    // Root directory all relative file and directory names resolve against.
    pub data_root_dir: PathBuf,

    pub imdb_file_train: Vec<String>,
    pub imdb_file_val: Vec<String>,
    pub imdb_file_test: Vec<String>,

    /// Feature directories, one entry per index file. Each entry is a
    /// comma-joined list of directories read side by side.
    pub image_feat_train: Vec<String>,
    pub image_feat_val: Vec<String>,
    pub image_feat_test: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocab_question_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocab_answer_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocab_layout_file: Option<String>,

    pub question_max_len: usize,
    // Only used when `vocab_layout_file` is set.
    pub layout_max_len: usize,

    pub prune_filter_module: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_depth_first: Option<bool>,
    pub image_fast_reader: bool,
    // Forces the slow feature reader on the dev split.
    pub enforce_slow_reader: bool,
    pub verbose: bool,
    pub test_mode: bool,
    pub copy_included: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_max_loc: Option<usize>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_type: None,
            data_root_dir: PathBuf::from("../data"),
            imdb_file_train: Vec::new(),
            imdb_file_val: Vec::new(),
            imdb_file_test: Vec::new(),
            image_feat_train: Vec::new(),
            image_feat_val: Vec::new(),
            image_feat_test: Vec::new(),
            vocab_question_file: None,
            vocab_answer_file: None,
            vocab_layout_file: None,
            question_max_len: DEFAULT_QUESTION_MAX_LEN,
            layout_max_len: DEFAULT_LAYOUT_MAX_LEN,
            prune_filter_module: false,
            image_depth_first: None,
            image_fast_reader: false,
            enforce_slow_reader: false,
            verbose: false,
            test_mode: false,
            copy_included: false,
            image_max_loc: None,
        }
    }
}

impl FromStr for DataConfig {
    type Err = BuilderError;

    /// Parse configuration from a TOML string.
    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s)
            .map_err(|e| BuilderError::config_with_source("failed to parse TOML config", e))
    }
}

impl DataConfig {
    // Load configuration from a TOML file.
    //
    // # Errors
    //
    // Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file without validating it, so overrides can
    /// still be applied.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BuilderError::storage_with_source(path, "failed to read config file", e)
        })?;
        content.parse()
    }

    /// Parses `dataset_type` into a [`Split`].
    ///
    /// There is no default split: an unset `dataset_type` is a
    /// `MissingOption` error.
    pub fn split(&self) -> Result<Split> {
        self.dataset_type
            .as_deref()
            .ok_or_else(|| BuilderError::missing_option("dataset_type"))?
            .parse()
    }

    /// Index files and feature-directory entries configured for `split`.
    pub fn split_lists(&self, split: Split) -> (&[String], &[String]) {
        match split {
            Split::Train => (&self.imdb_file_train, &self.image_feat_train),
            Split::Dev => (&self.imdb_file_val, &self.image_feat_val),
            Split::Test => (&self.imdb_file_test, &self.image_feat_test),
        }
    }

    /// Resolves a name relative to `data_root_dir`.
    ///
    /// Absolute names are returned unchanged.
    pub fn resolve(&self, name: impl AsRef<Path>) -> PathBuf {
        self.data_root_dir.join(name)
    }

    /// Effective layout length cap: zero unless a layout vocabulary is set.
    pub fn effective_layout_max_len(&self) -> usize {
        if self.vocab_layout_file.is_some() {
            self.layout_max_len
        } else {
            0
        }
    }

    // Apply environment variable overrides.
    //
    // Environment variables are prefixed with `VQA_` followed by the upper-cased
    // option name. For example:
    // - `VQA_DATASET_TYPE` overrides `dataset_type`
    // - `VQA_DATA_ROOT_DIR` overrides `data_root_dir`
    // - `VQA_IMAGE_FAST_READER` overrides `image_fast_reader`
    // Values that fail to parse are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("VQA_DATASET_TYPE") {
            self.dataset_type = Some(val);
        }
        if let Ok(val) = std::env::var("VQA_DATA_ROOT_DIR") {
            self.data_root_dir = PathBuf::from(val);
        }

        // Vocabulary files
        if let Ok(val) = std::env::var("VQA_VOCAB_QUESTION_FILE") {
            self.vocab_question_file = Some(val);
        }
        if let Ok(val) = std::env::var("VQA_VOCAB_ANSWER_FILE") {
            self.vocab_answer_file = Some(val);
        }
        if let Ok(val) = std::env::var("VQA_VOCAB_LAYOUT_FILE") {
            self.vocab_layout_file = Some(val);
        }

        // Length caps
        if let Ok(val) = std::env::var("VQA_QUESTION_MAX_LEN") {
            if let Ok(v) = val.parse() {
                self.question_max_len = v;
            }
        }
        if let Ok(val) = std::env::var("VQA_LAYOUT_MAX_LEN") {
            if let Ok(v) = val.parse() {
                self.layout_max_len = v;
            }
        }
        if let Ok(val) = std::env::var("VQA_IMAGE_MAX_LOC") {
            if let Ok(v) = val.parse() {
                self.image_max_loc = Some(v);
            }
        }

        // Reader flags
        if let Ok(val) = std::env::var("VQA_PRUNE_FILTER_MODULE") {
            if let Ok(v) = val.parse() {
                self.prune_filter_module = v;
            }
        }
        if let Ok(val) = std::env::var("VQA_IMAGE_DEPTH_FIRST") {
            if let Ok(v) = val.parse() {
                self.image_depth_first = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VQA_IMAGE_FAST_READER") {
            if let Ok(v) = val.parse() {
                self.image_fast_reader = v;
            }
        }
        if let Ok(val) = std::env::var("VQA_ENFORCE_SLOW_READER") {
            if let Ok(v) = val.parse() {
                self.enforce_slow_reader = v;
            }
        }
        if let Ok(val) = std::env::var("VQA_VERBOSE") {
            if let Ok(v) = val.parse() {
                self.verbose = v;
            }
        }
        if let Ok(val) = std::env::var("VQA_TEST_MODE") {
            if let Ok(v) = val.parse() {
                self.test_mode = v;
            }
        }
        if let Ok(val) = std::env::var("VQA_COPY_INCLUDED") {
            if let Ok(v) = val.parse() {
                self.copy_included = v;
            }
        }

        self
    }

    // Validate that every option required by the selected split is present.
    //
    // # Errors
    //
    // Returns `UnsupportedSplit` for an unknown `dataset_type` and
    // `MissingOption` for the first required option that is absent,
    // `dataset_type` included.
    pub fn validate(&self) -> Result<()> {
        let split = self.split()?;

        if self.data_root_dir.as_os_str().is_empty() {
            return Err(BuilderError::missing_option("data_root_dir"));
        }
        if self.vocab_question_file.is_none() {
            return Err(BuilderError::missing_option("vocab_question_file"));
        }
        if self.vocab_answer_file.is_none() {
            return Err(BuilderError::missing_option("vocab_answer_file"));
        }
        if self.image_depth_first.is_none() {
            return Err(BuilderError::missing_option("image_depth_first"));
        }

        let (imdb_key, feat_key) = split.option_keys();
        let (imdb_files, feat_dirs) = self.split_lists(split);
        if imdb_files.is_empty() {
            return Err(BuilderError::missing_option(imdb_key));
        }
        if feat_dirs.is_empty() {
            return Err(BuilderError::missing_option(feat_key));
        }

        Ok(())
    }
}

// Serialises tests that touch `VQA_*` environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

// Clears all VQA_ environment variables. Callers hold `ENV_LOCK`.
#[cfg(test)]
pub(crate) fn clear_vqa_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("VQA_") {
            std::env::remove_var(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn minimal_toml() -> &'static str {
        r#"
            dataset_type = "train"
            data_root_dir = "/data"
            imdb_file_train = ["imdb/train.jsonl"]
            image_feat_train = ["features/rcnn"]
            vocab_question_file = "vocab_questions.txt"
            vocab_answer_file = "answers.txt"
            image_depth_first = false
        "#
    }

    #[test]
    fn test_default_config() {
        let config = DataConfig::default();

        assert!(config.dataset_type.is_none());
        assert_eq!(config.data_root_dir, PathBuf::from("../data"));
        assert_eq!(config.question_max_len, 26);
        assert_eq!(config.layout_max_len, 13);
        assert!(!config.prune_filter_module);
        assert!(!config.image_fast_reader);
        assert!(!config.enforce_slow_reader);
        assert!(!config.verbose);
        assert!(!config.test_mode);
        assert!(!config.copy_included);
        assert!(config.image_depth_first.is_none());
        assert!(config.image_max_loc.is_none());
    }

    #[test]
    fn test_default_fails_validation_on_first_missing_option() {
        let config = DataConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BuilderError::MissingOption { ref key } if key == "dataset_type"));
    }

    #[test]
    fn test_missing_dataset_type_has_no_default_split() {
        let toml_without_split = minimal_toml().replace("dataset_type = \"train\"", "");
        let config: DataConfig = toml_without_split.parse().unwrap();

        assert!(config.dataset_type.is_none());
        let err = config.split().unwrap_err();
        assert!(matches!(err, BuilderError::MissingOption { ref key } if key == "dataset_type"));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BuilderError::MissingOption { ref key } if key == "dataset_type"));

        // Serialising an unset split leaves the key out.
        let toml_str = toml::to_string(&config).unwrap();
        assert!(!toml_str.contains("dataset_type"));
    }

    #[test]
    fn test_from_str_minimal() {
        let config: DataConfig = minimal_toml().parse().unwrap();

        assert_eq!(config.split().unwrap(), Split::Train);
        assert_eq!(config.data_root_dir, PathBuf::from("/data"));
        assert_eq!(config.imdb_file_train, vec!["imdb/train.jsonl"]);
        assert_eq!(config.image_depth_first, Some(false));
        // Unset options keep their defaults
        assert_eq!(config.question_max_len, 26);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result: std::result::Result<DataConfig, _> = "imdb_file_train = [".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_split_parsing() {
        assert_eq!("train".parse::<Split>().unwrap(), Split::Train);
        assert_eq!("dev".parse::<Split>().unwrap(), Split::Dev);
        assert_eq!("test".parse::<Split>().unwrap(), Split::Test);

        let err = "val".parse::<Split>().unwrap_err();
        assert!(matches!(err, BuilderError::UnsupportedSplit { .. }));
    }

    #[test]
    fn test_split_option_keys() {
        assert_eq!(
            Split::Train.option_keys(),
            ("imdb_file_train", "image_feat_train")
        );
        assert_eq!(Split::Dev.option_keys(), ("imdb_file_val", "image_feat_val"));
        assert_eq!(
            Split::Test.option_keys(),
            ("imdb_file_test", "image_feat_test")
        );
    }

    #[test]
    fn test_validate_unsupported_split() {
        let mut config: DataConfig = minimal_toml().parse().unwrap();
        config.dataset_type = Some("bogus".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BuilderError::UnsupportedSplit { ref split } if split == "bogus"));
    }

    #[test]
    fn test_validate_missing_image_depth_first() {
        let mut config: DataConfig = minimal_toml().parse().unwrap();
        config.image_depth_first = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("image_depth_first"));
    }

    #[test]
    fn test_validate_missing_split_lists() {
        let mut config: DataConfig = minimal_toml().parse().unwrap();
        config.dataset_type = Some("dev".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BuilderError::MissingOption { ref key } if key == "imdb_file_val"));

        config.imdb_file_val = vec!["imdb/val.jsonl".to_string()];
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BuilderError::MissingOption { ref key } if key == "image_feat_val"));
    }

    #[test]
    fn test_effective_layout_max_len() {
        let mut config = DataConfig::default();
        config.layout_max_len = 20;
        assert_eq!(config.effective_layout_max_len(), 0);

        config.vocab_layout_file = Some("vocab_layout.txt".to_string());
        assert_eq!(config.effective_layout_max_len(), 20);
    }

    #[test]
    fn test_resolve_against_data_root() {
        let mut config = DataConfig::default();
        config.data_root_dir = PathBuf::from("/data");
        assert_eq!(config.resolve("featA"), PathBuf::from("/data/featA"));
        assert_eq!(config.resolve("/abs/featB"), PathBuf::from("/abs/featB"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", minimal_toml()).unwrap();

        let config = DataConfig::from_file(file.path()).unwrap();
        assert_eq!(config.vocab_answer_file.as_deref(), Some("answers.txt"));
    }

    #[test]
    fn test_from_file_not_found() {
        let result = DataConfig::from_file("/nonexistent/vqa2.toml");
        assert!(matches!(result, Err(BuilderError::Storage { .. })));
    }

    #[test]
    fn test_read_file_skips_validation() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_root_dir = \"/data\"").unwrap();

        let config = DataConfig::read_file(file.path()).unwrap();
        assert_eq!(config.data_root_dir, PathBuf::from("/data"));
        assert!(config.validate().is_err());
        assert!(DataConfig::from_file(file.path()).is_err());
    }

    // Environment variables are process-global, so all override checks live
    // in one test.
    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_vqa_env_vars();

        std::env::set_var("VQA_DATASET_TYPE", "dev");
        std::env::set_var("VQA_DATA_ROOT_DIR", "/env/data");
        std::env::set_var("VQA_QUESTION_MAX_LEN", "14");
        std::env::set_var("VQA_IMAGE_FAST_READER", "true");
        std::env::set_var("VQA_ENFORCE_SLOW_READER", "true");
        std::env::set_var("VQA_IMAGE_MAX_LOC", "100");

        let config = DataConfig::default().with_env_overrides();

        assert_eq!(config.dataset_type.as_deref(), Some("dev"));
        assert_eq!(config.data_root_dir, PathBuf::from("/env/data"));
        assert_eq!(config.question_max_len, 14);
        assert!(config.image_fast_reader);
        assert!(config.enforce_slow_reader);
        assert_eq!(config.image_max_loc, Some(100));

        clear_vqa_env_vars();

        // Invalid values are ignored
        std::env::set_var("VQA_QUESTION_MAX_LEN", "many");
        let config = DataConfig::default().with_env_overrides();
        assert_eq!(config.question_max_len, 26);

        clear_vqa_env_vars();
    }

    #[test]
    fn test_serialize_roundtrip() {
        let original: DataConfig = minimal_toml().parse().unwrap();
        let toml_str = toml::to_string(&original).unwrap();
        let parsed: DataConfig = toml_str.parse().unwrap();

        assert_eq!(original.imdb_file_train, parsed.imdb_file_train);
        assert_eq!(original.image_depth_first, parsed.image_depth_first);
        assert_eq!(original.vocab_layout_file, parsed.vocab_layout_file);
    }
}
