// rust/builder-core/src/builder/mod.rs

//! Dataset builders.
//!
//! A builder turns a [`DataConfig`] into a loaded dataset and reports the
//! vocabulary-derived sizes the model needs before it is constructed.

mod vqa2;

pub use vqa2::Vqa2Builder;

use std::sync::Arc;

use crate::config::DataConfig;
use crate::dataset::ConcatDataset;
use crate::error::Result;

/// Builds the dataset for one task.
pub trait DatasetBuilder: Send + std::fmt::Debug {
    /// Registry name of the task.
    fn name(&self) -> &str;

    /// Builds the dataset for the split selected by `config` and keeps it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any shard fails
    /// to build. On failure no dataset is kept, including one from an
    /// earlier successful `load`.
    fn load(&mut self, config: &DataConfig) -> Result<Arc<ConcatDataset>>;

    /// Dataset kept by the last successful `load`.
    fn dataset(&self) -> Option<&Arc<ConcatDataset>>;

    /// Writes the model sizing keys into `config`.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` when called before a successful `load`.
    fn update_config_for_model(&self, config: &mut toml::Table) -> Result<()>;
}

/// Sizes a model takes from the loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSizing {
    pub num_vocab_txt: usize,
    pub vocab_size: usize,
    pub num_choices: usize,
    pub num_image_features: usize,
}

impl ModelSizing {
    /// Inserts the four sizing keys, replacing existing values.
    pub fn apply_to(&self, config: &mut toml::Table) {
        let entries = [
            ("num_vocab_txt", self.num_vocab_txt),
            ("vocab_size", self.vocab_size),
            ("num_choices", self.num_choices),
            ("num_image_features", self.num_image_features),
        ];
        for (key, value) in entries {
            config.insert(key.to_string(), toml::Value::Integer(value as i64));
        }
    }
}
