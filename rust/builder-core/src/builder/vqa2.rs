// rust/builder-core/src/builder/vqa2.rs

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{DataConfig, Split};
use crate::dataset::{vqa2_shard, ConcatDataset, ShardFactory, ShardOptions, VqaDataset};
use crate::error::{BuilderError, Result};

use super::{DatasetBuilder, ModelSizing};

/// Builder for the VQA2 task.
///
/// Each split reads its own pair of options: index files and
/// comma-joined feature directories, one entry per shard. The shard type
/// comes from the [`ShardFactory`] given at construction.
pub struct Vqa2Builder {
    shard_factory: Arc<dyn ShardFactory>,
    dataset: Option<Arc<ConcatDataset>>,
    num_image_features: usize,
}

impl Vqa2Builder {
    /// Registry name.
    pub const NAME: &'static str = "vqa2";

    /// Creates a builder producing [`Vqa2Dataset`](crate::dataset::Vqa2Dataset) shards.
    pub fn new() -> Self {
        Self::with_shard_factory(vqa2_shard)
    }

    /// Creates a builder producing shards from `factory`.
    pub fn with_shard_factory(factory: impl ShardFactory + 'static) -> Self {
        Self::from_shared_factory(Arc::new(factory))
    }

    /// Creates a builder sharing an existing factory.
    pub fn from_shared_factory(shard_factory: Arc<dyn ShardFactory>) -> Self {
        Self {
            shard_factory,
            dataset: None,
            num_image_features: 0,
        }
    }

    /// Number of feature streams per sample, known after `load`.
    pub fn num_image_features(&self) -> usize {
        self.num_image_features
    }

    /// Sizing facts for the model, available after `load`.
    pub fn model_sizing(&self) -> Result<ModelSizing> {
        let dataset = self.dataset.as_ref().ok_or(BuilderError::NotLoaded)?;
        let num_vocab = dataset.vocab_dict().num_vocab();

        Ok(ModelSizing {
            num_vocab_txt: num_vocab,
            vocab_size: num_vocab,
            num_choices: dataset.answer_dict().num_vocab(),
            num_image_features: self.num_image_features,
        })
    }

    fn prepare_train_data_set(&self, config: &DataConfig) -> Result<ConcatDataset> {
        self.prepare_data_set(config, Split::Train, config.image_fast_reader)
    }

    fn prepare_eval_data_set(&self, config: &DataConfig) -> Result<ConcatDataset> {
        let fast_read = config.image_fast_reader && !config.enforce_slow_reader;
        self.prepare_data_set(config, Split::Dev, fast_read)
    }

    fn prepare_test_data_set(&self, config: &DataConfig) -> Result<ConcatDataset> {
        self.prepare_data_set(config, Split::Test, false)
    }

    fn prepare_data_set(
        &self,
        config: &DataConfig,
        split: Split,
        fast_read: bool,
    ) -> Result<ConcatDataset> {
        let (imdb_key, feat_key) = split.option_keys();
        let (imdb_files, feat_dirs) = config.split_lists(split);

        if imdb_files.len() != feat_dirs.len() {
            return Err(BuilderError::shape_mismatch(
                imdb_key,
                imdb_files.len(),
                feat_key,
                feat_dirs.len(),
            ));
        }

        let vocab_question_file = config.resolve(required(
            config.vocab_question_file.as_deref(),
            "vocab_question_file",
        )?);
        let vocab_answer_file = config.resolve(required(
            config.vocab_answer_file.as_deref(),
            "vocab_answer_file",
        )?);
        let image_depth_first = required(config.image_depth_first, "image_depth_first")?;

        let mut datasets: Vec<Box<dyn VqaDataset>> = Vec::with_capacity(imdb_files.len());
        for (imdb_name, feat_entry) in imdb_files.iter().zip(feat_dirs) {
            let options = ShardOptions {
                imdb_file: config.resolve(imdb_name),
                image_feat_directories: feature_directories(config, feat_entry),
                t_encoder: config.question_max_len,
                t_decoder: config.effective_layout_max_len(),
                assembler: None,
                vocab_question_file: vocab_question_file.clone(),
                vocab_answer_file: vocab_answer_file.clone(),
                prune_filter_module: config.prune_filter_module,
                image_depth_first,
                fast_read,
                verbose: config.verbose,
                test_mode: config.test_mode,
                dataset_type: split,
                copy_included: config.copy_included,
                image_max_loc: config.image_max_loc,
            };

            tracing::debug!(
                "Building {} shard {} from {} with {} feature directories",
                split,
                datasets.len(),
                options.imdb_file.display(),
                options.image_feat_directories.len()
            );
            datasets.push(self.shard_factory.build(options)?);
        }

        ConcatDataset::new(datasets)
    }
}

impl Default for Vqa2Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Vqa2Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vqa2Builder")
            .field("loaded", &self.dataset.is_some())
            .field("num_image_features", &self.num_image_features)
            .finish()
    }
}

impl DatasetBuilder for Vqa2Builder {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn load(&mut self, config: &DataConfig) -> Result<Arc<ConcatDataset>> {
        // A failed load must not leave the previous split's dataset behind.
        self.dataset = None;
        self.num_image_features = 0;

        config.validate()?;
        let split = config.split()?;

        let dataset = match split {
            Split::Train => self.prepare_train_data_set(config)?,
            Split::Dev => self.prepare_eval_data_set(config)?,
            Split::Test => self.prepare_test_data_set(config)?,
        };

        let (_, feat_dirs) = config.split_lists(split);
        self.num_image_features = feat_dirs
            .first()
            .map(|entry| entry.split(',').count())
            .unwrap_or(0);

        tracing::info!(
            "Loaded {} {} split: {} shards, {} samples, {} image feature streams",
            Self::NAME,
            split,
            dataset.num_shards(),
            dataset.len(),
            self.num_image_features
        );

        let dataset = Arc::new(dataset);
        self.dataset = Some(dataset.clone());
        Ok(dataset)
    }

    fn dataset(&self) -> Option<&Arc<ConcatDataset>> {
        self.dataset.as_ref()
    }

    fn update_config_for_model(&self, config: &mut toml::Table) -> Result<()> {
        self.model_sizing()?.apply_to(config);
        Ok(())
    }
}

fn required<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| BuilderError::missing_option(key))
}

/// Splits a comma-joined feature entry and resolves each directory as written.
fn feature_directories(config: &DataConfig, entry: &str) -> Vec<PathBuf> {
    entry.split(',').map(|dir| config.resolve(dir)).collect()
}
