// rust/builder-core/src/dataset/vqa2.rs

//! Default VQA2 shard.
//!
//! A shard reads its index file once, splits it into newline-delimited
//! records and loads the question and answer vocabularies. Record contents
//! are handed to the training loop as raw bytes together with the reader
//! settings in [`ShardOptions`]; decoding them is left to the consumer.

use std::ops::Range;

use crate::error::{BuilderError, Result};

use super::shard::ShardOptions;
use super::traits::{index_records, NewlineDelimitedFormat, RecordFormat, VqaDataset, VqaSample};
use super::vocab::VocabDict;

pub struct Vqa2Dataset {
    options: ShardOptions,
    data: Vec<u8>,
    records: Vec<Range<usize>>,
    vocab_dict: VocabDict,
    answer_dict: VocabDict,
}

impl Vqa2Dataset {
    /// Opens a shard.
    ///
    /// # Errors
    ///
    /// Returns an error if a vocabulary or the index file cannot be read, or
    /// if a feature directory does not exist.
    pub fn new(options: ShardOptions) -> Result<Self> {
        let vocab_dict = VocabDict::from_file(&options.vocab_question_file)?;
        let answer_dict = VocabDict::from_file(&options.vocab_answer_file)?;

        for dir in &options.image_feat_directories {
            if !dir.is_dir() {
                return Err(BuilderError::storage(dir, "feature directory not found"));
            }
        }

        let data = std::fs::read(&options.imdb_file).map_err(|e| {
            BuilderError::storage_with_source(&options.imdb_file, "failed to read index file", e)
        })?;

        let format = NewlineDelimitedFormat::new();
        let records: Vec<Range<usize>> = index_records(&data, &format)
            .map_err(|offset| {
                BuilderError::dataset(
                    options.imdb_file.display().to_string(),
                    format!("incomplete {} record at byte {offset}", format.name()),
                )
            })?
            .into_iter()
            .filter(|range| !data[range.clone()].iter().all(u8::is_ascii_whitespace))
            .collect();

        if options.verbose {
            tracing::info!(
                "Loaded {} records from {} ({} feature directories, fast_read={})",
                records.len(),
                options.imdb_file.display(),
                options.image_feat_directories.len(),
                options.fast_read
            );
        }

        Ok(Self {
            options,
            data,
            records,
            vocab_dict,
            answer_dict,
        })
    }

    /// Options the shard was built with.
    pub fn options(&self) -> &ShardOptions {
        &self.options
    }
}

impl std::fmt::Debug for Vqa2Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vqa2Dataset")
            .field("imdb_file", &self.options.imdb_file)
            .field("num_records", &self.records.len())
            .field("num_vocab", &self.vocab_dict.num_vocab())
            .field("num_answers", &self.answer_dict.num_vocab())
            .finish()
    }
}

impl VqaDataset for Vqa2Dataset {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, index: usize) -> Option<VqaSample> {
        let range = self.records.get(index)?;
        Some(VqaSample {
            shard_index: 0,
            record_index: index,
            record: self.data[range.clone()].to_vec(),
        })
    }

    fn vocab_dict(&self) -> &VocabDict {
        &self.vocab_dict
    }

    fn answer_dict(&self) -> &VocabDict {
        &self.answer_dict
    }

    fn name(&self) -> &str {
        "vqa2"
    }
}

/// Shard factory used by the VQA2 builder when none is injected.
pub fn vqa2_shard(options: ShardOptions) -> Result<Box<dyn VqaDataset>> {
    Ok(Box::new(Vqa2Dataset::new(options)?))
}
