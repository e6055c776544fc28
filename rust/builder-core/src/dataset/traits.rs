// rust/builder-core/src/dataset/traits.rs

use std::ops::Range;

use super::vocab::VocabDict;

/// One record read from a shard's index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VqaSample {
    /// Position of the owning shard inside its container (0 for a lone shard)
    pub shard_index: usize,
    /// Position of the record inside its shard
    pub record_index: usize,
    /// Raw record bytes, without the record delimiter
    pub record: Vec<u8>,
}

/// An indexed collection of VQA records with its vocabularies.
///
/// Implementations must be `Send + Sync` so loaders can share them across
/// worker threads behind an `Arc`.
pub trait VqaDataset: Send + Sync {
    /// Total number of records.
    fn len(&self) -> usize;

    /// Whether the dataset holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at `index`, or `None` when out of range.
    fn get(&self, index: usize) -> Option<VqaSample>;

    /// Question vocabulary.
    fn vocab_dict(&self) -> &VocabDict;

    /// Answer vocabulary; its size is the number of answer choices.
    fn answer_dict(&self) -> &VocabDict;

    /// Human-readable name, used in logs and errors.
    fn name(&self) -> &str {
        "vqa"
    }
}

/// Describes how to find record boundaries
pub trait RecordFormat: Send + Sync {
    /// Find the end of the record that starts at `offset` in `data`.
    /// Returns the byte position after the record ends (exclusive end).
    /// Returns None if no complete record is found.
    fn find_record_end(&self, data: &[u8], offset: usize) -> Option<usize>;

    /// Byte range of the payload inside a record, with framing removed.
    fn payload(&self, data: &[u8], record: Range<usize>) -> Range<usize>;

    /// Whether bytes left after the last complete record form a record.
    fn accepts_unterminated_tail(&self) -> bool {
        false
    }

    /// Name of this record format
    fn name(&self) -> &'static str;
}

/// Newline-delimited records (JSONL, CSV, ...)
#[derive(Debug, Clone, Default)]
pub struct NewlineDelimitedFormat;

impl NewlineDelimitedFormat {
    pub fn new() -> Self {
        Self
    }
}

impl RecordFormat for NewlineDelimitedFormat {
    fn find_record_end(&self, data: &[u8], offset: usize) -> Option<usize> {
        if offset >= data.len() {
            return None;
        }

        data[offset..]
            .iter()
            .position(|&byte| byte == b'\n')
            .map(|i| offset + i + 1) // Include the newline
    }

    fn payload(&self, data: &[u8], record: Range<usize>) -> Range<usize> {
        let mut end = record.end;
        if end > record.start && data[end - 1] == b'\n' {
            end -= 1;
        }
        if end > record.start && data[end - 1] == b'\r' {
            end -= 1;
        }
        record.start..end
    }

    fn accepts_unterminated_tail(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "newline-delimited"
    }
}

/// Splits `data` into record payload ranges.
///
/// Returns `Err(offset)` with the start of the first incomplete record when
/// the format does not accept an unterminated tail.
pub fn index_records(
    data: &[u8],
    format: &dyn RecordFormat,
) -> std::result::Result<Vec<Range<usize>>, usize> {
    let mut records = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        match format.find_record_end(data, offset) {
            Some(end) => {
                records.push(format.payload(data, offset..end));
                offset = end;
            }
            None if format.accepts_unterminated_tail() => {
                records.push(format.payload(data, offset..data.len()));
                break;
            }
            None => return Err(offset),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_format_boundary() {
        let format = NewlineDelimitedFormat::new();

        let data = b"hello\nworld\n";
        assert_eq!(format.find_record_end(data, 0), Some(6)); // "hello\n"
        assert_eq!(format.find_record_end(data, 6), Some(12)); // "world\n"

        // Starting in the middle of a line
        assert_eq!(format.find_record_end(data, 3), Some(6));

        // No newline found
        assert_eq!(format.find_record_end(b"hello world", 0), None);

        // Empty after offset
        assert_eq!(format.find_record_end(data, 12), None);
    }

    #[test]
    fn test_index_records_with_unterminated_tail() {
        let format = NewlineDelimitedFormat::new();
        let data = b"{\"q\":1}\n{\"q\":2}";

        let records = index_records(data, &format).unwrap();
        assert_eq!(records, vec![0..7, 8..15]);
        assert_eq!(&data[records[0].clone()], b"{\"q\":1}");
        assert_eq!(&data[records[1].clone()], b"{\"q\":2}");
    }

    #[test]
    fn test_index_records_empty_input() {
        let format = NewlineDelimitedFormat::new();
        assert!(index_records(b"", &format).unwrap().is_empty());
    }

    struct TerminatedOnly;

    impl RecordFormat for TerminatedOnly {
        fn find_record_end(&self, data: &[u8], offset: usize) -> Option<usize> {
            NewlineDelimitedFormat.find_record_end(data, offset)
        }

        fn payload(&self, _data: &[u8], record: Range<usize>) -> Range<usize> {
            record
        }

        fn name(&self) -> &'static str {
            "terminated-only"
        }
    }

    #[test]
    fn test_index_records_rejects_incomplete_tail() {
        let result = index_records(b"a\nb", &TerminatedOnly);
        assert_eq!(result, Err(2));
    }
}
