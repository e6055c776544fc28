// rust/builder-core/src/dataset/concat.rs

use crate::error::{BuilderError, Result};

use super::traits::{VqaDataset, VqaSample};
use super::vocab::VocabDict;

/// Shards exposed end-to-end as one dataset.
///
/// Global indices run through the shards in order; vocabularies are those of
/// the first shard.
pub struct ConcatDataset {
    datasets: Vec<Box<dyn VqaDataset>>,
    cumulative_sizes: Vec<usize>,
}

impl ConcatDataset {
    /// Creates a concatenation of `datasets`.
    ///
    /// # Errors
    ///
    /// Returns an error if `datasets` is empty.
    pub fn new(datasets: Vec<Box<dyn VqaDataset>>) -> Result<Self> {
        if datasets.is_empty() {
            return Err(BuilderError::dataset(
                "concat",
                "need at least one shard dataset",
            ));
        }

        let cumulative_sizes = datasets
            .iter()
            .scan(0, |total, ds| {
                *total += ds.len();
                Some(*total)
            })
            .collect();

        Ok(Self {
            datasets,
            cumulative_sizes,
        })
    }

    pub fn num_shards(&self) -> usize {
        self.datasets.len()
    }

    pub fn shard(&self, shard_index: usize) -> Option<&dyn VqaDataset> {
        self.datasets.get(shard_index).map(|ds| ds.as_ref())
    }

    pub fn shards(&self) -> impl Iterator<Item = &dyn VqaDataset> {
        self.datasets.iter().map(|ds| ds.as_ref())
    }

    /// Locate which shard and local index a global index maps to.
    fn locate(&self, index: usize) -> Option<(usize, usize)> {
        // First shard whose cumulative size exceeds the index
        let shard_index = self.cumulative_sizes.partition_point(|&cum| cum <= index);
        if shard_index == self.cumulative_sizes.len() {
            return None;
        }
        let offset = if shard_index == 0 {
            0
        } else {
            self.cumulative_sizes[shard_index - 1]
        };
        Some((shard_index, index - offset))
    }
}

impl std::fmt::Debug for ConcatDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcatDataset")
            .field("num_shards", &self.datasets.len())
            .field("len", &self.len())
            .finish()
    }
}

impl VqaDataset for ConcatDataset {
    fn len(&self) -> usize {
        self.cumulative_sizes.last().copied().unwrap_or(0)
    }

    fn get(&self, index: usize) -> Option<VqaSample> {
        let (shard_index, local_index) = self.locate(index)?;
        let mut sample = self.datasets[shard_index].get(local_index)?;
        sample.shard_index = shard_index;
        Some(sample)
    }

    fn vocab_dict(&self) -> &VocabDict {
        self.datasets[0].vocab_dict()
    }

    fn answer_dict(&self) -> &VocabDict {
        self.datasets[0].answer_dict()
    }

    fn name(&self) -> &str {
        "concat"
    }
}
