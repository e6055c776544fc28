// rust/builder-core/src/dataset/mod.rs

//! Shard datasets and the container that concatenates them.
//!
//! A builder turns each (index file, feature directories) pair into one
//! shard through a [`ShardFactory`], then wraps the shards in a
//! [`ConcatDataset`] that the training loop indexes as a single dataset.
//!
//! # Example
//!
//! ```ignore
//! use builder_core::dataset::{vqa2_shard, ConcatDataset, ShardFactory, VqaDataset};
//!
//! let shard = vqa2_shard.build(options)?;
//! let dataset = ConcatDataset::new(vec![shard])?;
//!
//! for index in 0..dataset.len() {
//!     let sample = dataset.get(index).unwrap();
//!     // Decode sample.record
//! }
//! ```

mod concat;
mod shard;
mod traits;
mod vocab;
mod vqa2;

pub use concat::ConcatDataset;
pub use shard::{ShardFactory, ShardOptions};
pub use traits::{index_records, NewlineDelimitedFormat, RecordFormat, VqaDataset, VqaSample};
pub use vocab::VocabDict;
pub use vqa2::{vqa2_shard, Vqa2Dataset};
