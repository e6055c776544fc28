// rust/builder-core/src/lib.rs

//! VQA Dataset Builder - Core Library
//!
//! This crate turns a data configuration into the datasets a visual question
//! answering training run iterates over, including typed configuration,
//! error handling, shard construction, the builder registry, and the
//! vocabulary sizes reported to model configuration.

pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use config::{DataConfig, Split};
pub use error::{BuilderError, Result};

pub mod dataset;
pub use dataset::{
    vqa2_shard, ConcatDataset, ShardFactory, ShardOptions, VocabDict, Vqa2Dataset, VqaDataset,
    VqaSample,
};

pub mod builder;
pub use builder::{DatasetBuilder, ModelSizing, Vqa2Builder};

pub mod registry;
pub use registry::{BuilderFactory, BuilderRegistry};

pub mod runtime;
pub use runtime::Runtime;
