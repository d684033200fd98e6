//! File-level metadata: the footer's batch index and the schema of the file.
//!
//! [`FileMetadata`] is usually produced once, either by the writer or by
//! [`FileMetadata::load`], and then shared read-only between any number of
//! [`BatchFileReader`](crate::BatchFileReader)s.

use crate::error::{Error, IoResultExt, Result};
use crate::format::FOOTER_OFFSET_SIZE;
use crate::io::framing;
use crate::io::fs::FileSystem;
use arrow::datatypes::SchemaRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Location and size of one record batch inside a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Byte offset of the batch from the start of the file.
    pub offset: u64,
    /// Number of rows in the batch. Zero-row batches are skipped on read.
    pub record_count: u64,
}

impl BatchSummary {
    #[inline]
    #[must_use]
    pub fn new(offset: u64, record_count: u64) -> Self {
        Self {
            offset,
            record_count,
        }
    }
}

/// Ordered index of every batch in a file, in physical order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFooter {
    pub batches: Vec<BatchSummary>,
}

impl FileFooter {
    #[must_use]
    pub fn new(batches: Vec<BatchSummary>) -> Self {
        Self { batches }
    }

    /// Total rows across all batches, saturating at `u64::MAX`.
    #[must_use]
    pub fn record_count(&self) -> u64 {
        self.batches
            .iter()
            .fold(0u64, |acc, b| acc.saturating_add(b.record_count))
    }

    /// Total rows across all batches, or `None` if the counts overflow `u64`.
    #[must_use]
    pub fn try_record_count(&self) -> Option<u64> {
        self.batches
            .iter()
            .try_fold(0u64, |acc, b| acc.checked_add(b.record_count))
    }

    /// Number of batches that hold at least one row.
    #[must_use]
    pub fn non_empty_batches(&self) -> usize {
        self.batches.iter().filter(|b| b.record_count > 0).count()
    }
}

/// Everything a reader needs to know about one file.
#[derive(Clone, Debug)]
pub struct FileMetadata {
    /// Path of the file, relative to the base path given to the reader.
    pub path: PathBuf,
    /// Total number of rows. Expected to equal `footer.record_count()`.
    pub record_count: u64,
    pub footer: FileFooter,
    /// Schema used for empty results. When `None`, it is read from the file footer.
    pub schema: Option<SchemaRef>,
}

impl FileMetadata {
    /// Build metadata whose record count is derived from the footer.
    ///
    /// The count saturates; [`load`](Self::load) rejects footers whose counts overflow.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, footer: FileFooter, schema: Option<SchemaRef>) -> Self {
        Self {
            path: path.into(),
            record_count: footer.record_count(),
            footer,
            schema,
        }
    }

    /// Read metadata from the trailer and footer of `base_path/path`.
    ///
    /// The framing is always validated here since the trailer is consumed.
    ///
    /// # Errors
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be opened or read, and
    /// [`Error::DataFormat`](crate::Error::DataFormat) if the trailer or footer is invalid.
    pub fn load<F: FileSystem + ?Sized>(
        fs: &F,
        base_path: impl AsRef<Path>,
        path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let path = path.into();
        let resolved = base_path.as_ref().join(&path);
        let size = fs.attributes(&resolved).at(&resolved)?.size;
        let mut stream = fs.open(&resolved).at(&resolved)?;
        let mut scratch = [0u8; FOOTER_OFFSET_SIZE];

        framing::validate_framing(stream.as_mut(), size, &resolved, &mut scratch)?;
        let (schema, footer) = framing::read_footer(stream.as_mut(), size, &resolved, &mut scratch)?;
        let Some(records) = footer.try_record_count() else {
            return Err(Error::data_format(&resolved, "footer record counts overflow u64"));
        };

        tracing::debug!(
            path = %resolved.display(),
            batches = footer.batches.len(),
            records,
            "loaded batch file metadata"
        );
        Ok(Self::new(path, footer, Some(schema)))
    }

    /// Whether the file holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_count_sums_batches() {
        let footer = FileFooter::new(vec![
            BatchSummary::new(10, 4),
            BatchSummary::new(90, 0),
            BatchSummary::new(120, 6),
        ]);
        assert_eq!(footer.record_count(), 10);
        assert_eq!(footer.try_record_count(), Some(10));
        assert_eq!(footer.non_empty_batches(), 2);
    }

    #[test]
    fn overflowing_counts_are_detected() {
        let footer = FileFooter::new(vec![
            BatchSummary::new(10, u64::MAX),
            BatchSummary::new(10, 2),
        ]);
        assert_eq!(footer.try_record_count(), None);
        assert_eq!(footer.record_count(), u64::MAX);
        assert_eq!(FileMetadata::new("x.batch", footer, None).record_count, u64::MAX);
    }
}
