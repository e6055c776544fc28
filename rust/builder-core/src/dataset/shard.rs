// rust/builder-core/src/dataset/shard.rs

use std::path::PathBuf;

use crate::config::Split;
use crate::error::Result;

use super::traits::VqaDataset;

/// Everything a shard constructor receives for one
/// (index file, feature directories) pair.
///
/// Paths are already resolved against the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardOptions {
    pub imdb_file: PathBuf,
    pub image_feat_directories: Vec<PathBuf>,
    /// Question length cap (encoder steps)
    pub t_encoder: usize,
    /// Layout length cap (decoder steps); 0 without a layout vocabulary
    pub t_decoder: usize,
    /// Layout assembler; the VQA2 builder never supplies one
    pub assembler: Option<String>,
    pub vocab_question_file: PathBuf,
    pub vocab_answer_file: PathBuf,
    pub prune_filter_module: bool,
    pub image_depth_first: bool,
    pub fast_read: bool,
    pub verbose: bool,
    pub test_mode: bool,
    pub dataset_type: Split,
    pub copy_included: bool,
    pub image_max_loc: Option<usize>,
}

/// Constructs one shard dataset from resolved options.
///
/// Any `Fn(ShardOptions) -> Result<Box<dyn VqaDataset>>` is a factory, so a
/// plain function or closure can be handed to a builder.
pub trait ShardFactory: Send + Sync {
    fn build(&self, options: ShardOptions) -> Result<Box<dyn VqaDataset>>;
}

impl<F> ShardFactory for F
where
    F: Fn(ShardOptions) -> Result<Box<dyn VqaDataset>> + Send + Sync,
{
    fn build(&self, options: ShardOptions) -> Result<Box<dyn VqaDataset>> {
        self(options)
    }
}
