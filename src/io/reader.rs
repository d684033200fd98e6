//! Range reads over a batch file.
//!
//! [`BatchFileReader`] resolves a logical row range `[start, start + limit)` to
//! the batches that hold it, decodes only those, and trims the first and last
//! one with a [`BatchWindow`].
//!
//! ```no_run
//! use ironbatch::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let fs = LocalFileSystem;
//! let metadata = FileMetadata::load(&fs, "/data/results", "job-17.batch")?;
//!
//! let mut reader = BatchFileReader::new(&fs, "/data/results", &metadata);
//! for window in reader.read(500, 100)? {
//!     let rows = window.slice();
//!     println!("{} rows", rows.num_rows());
//! }
//! reader.close();
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//! The file is opened on the first `read` and the same stream serves every later
//! call. [`close`](BatchFileReader::close) releases it; dropping the reader does
//! the same. Reads after `close` fail with [`Error::Closed`].

use crate::config::ReaderConfig;
use crate::error::{Error, IoResultExt, Result};
use crate::format::FOOTER_OFFSET_SIZE;
use crate::io::decode::decode_batch_at;
use crate::io::framing;
use crate::io::fs::{FileSystem, LocalFileSystem, SeekableStream};
use crate::metadata::FileMetadata;
use crate::metrics::ReadStats;
use crate::window::BatchWindow;
use arrow::datatypes::SchemaRef;
use std::path::{Path, PathBuf};
use std::sync::Arc;

enum StreamState {
    Unopened,
    Open(Box<dyn SeekableStream>),
    Closed,
}

/// Reader for one batch file, serving any number of range reads.
///
/// Not shareable between threads while reading: `read` takes `&mut self` since
/// it moves the stream position. Use one reader per thread for parallel reads.
pub struct BatchFileReader<'a, F: FileSystem + ?Sized = LocalFileSystem> {
    fs: &'a F,
    metadata: &'a FileMetadata,
    path: PathBuf,
    config: ReaderConfig,
    state: StreamState,
    scratch: [u8; FOOTER_OFFSET_SIZE],
    // Schema read from the footer when the metadata carries none.
    footer_schema: Option<SchemaRef>,
    stats: ReadStats,
}

impl<'a, F: FileSystem + ?Sized> BatchFileReader<'a, F> {
    /// Create a reader for `base_path/metadata.path` with the default config.
    /// Nothing is opened until the first read.
    pub fn new(fs: &'a F, base_path: impl AsRef<Path>, metadata: &'a FileMetadata) -> Self {
        Self::with_config(fs, base_path, metadata, ReaderConfig::default())
    }

    pub fn with_config(
        fs: &'a F,
        base_path: impl AsRef<Path>,
        metadata: &'a FileMetadata,
        config: ReaderConfig,
    ) -> Self {
        Self {
            fs,
            metadata,
            path: base_path.as_ref().join(&metadata.path),
            config,
            state: StreamState::Unopened,
            scratch: [0u8; FOOTER_OFFSET_SIZE],
            footer_schema: None,
            stats: ReadStats::default(),
        }
    }

    /// Resolved path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn metadata(&self) -> &FileMetadata {
        self.metadata
    }

    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, StreamState::Open(_))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.state, StreamState::Closed)
    }

    /// Read rows `[start, start + limit)` as windows over the batches holding them.
    ///
    /// Windows come back in file order and their sizes add up to `limit`. When
    /// `limit` is zero or the file is empty, a single zero-row window carrying
    /// the file schema is returned.
    ///
    /// `start == 0` is accepted on an empty file so that empty files can be
    /// probed with `read(0, 0)`.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the range does not fit the file; no I/O is done.
    /// - [`Error::DataFormat`] if framing validation fails or a batch or the footer
    ///   cannot be decoded.
    /// - [`Error::Io`] if opening, seeking or reading fails.
    /// - [`Error::Closed`] after [`close`](Self::close).
    ///
    /// On error nothing is returned; batches decoded so far are dropped.
    pub fn read(&mut self, start: u64, limit: u64) -> Result<Vec<BatchWindow>> {
        check_range(self.metadata.record_count, start, limit)?;
        self.ensure_open()?;

        let StreamState::Open(stream) = &mut self.state else {
            return Err(Error::Closed {
                path: self.path.clone(),
            });
        };
        let stream = stream.as_mut();
        let path = self.path.as_path();

        let mut windows = Vec::new();
        let mut stats = ReadStats {
            reads: 1,
            ..ReadStats::default()
        };
        let mut running_count = 0u64;
        let mut remaining = limit;

        for summary in &self.metadata.footer.batches {
            if remaining == 0 {
                break;
            }
            if summary.record_count == 0 {
                continue;
            }
            running_count = running_count.checked_add(summary.record_count).ok_or_else(|| {
                Error::data_format(
                    path,
                    format!("footer record counts overflow u64 at batch offset {}", summary.offset),
                )
            })?;

            // Rows seen so far are [0, running_count); the start lies further on.
            if start >= running_count {
                stats.batches_skipped += 1;
                continue;
            }

            let batch = decode_batch_at(stream, summary, path)?;
            stats.batches_decoded += 1;
            if self.config.verify_batch_row_counts && batch.num_rows() as u64 != summary.record_count
            {
                return Err(Error::data_format(
                    path,
                    format!(
                        "batch at offset {} has {} rows, footer records {}",
                        summary.offset,
                        batch.num_rows(),
                        summary.record_count
                    ),
                ));
            }

            let batch_start = start.saturating_sub(running_count - summary.record_count);
            let batch_end = summary.record_count.min(batch_start + remaining);
            let (s, e) = (to_index(batch_start, path)?, to_index(batch_end, path)?);
            let window = BatchWindow::try_new(batch, s, e).ok_or_else(|| {
                Error::data_format(
                    path,
                    format!("batch at offset {} cannot hold rows [{s}, {e})", summary.offset),
                )
            })?;

            remaining -= window.size() as u64;
            windows.push(window);
        }

        if remaining > 0 {
            return Err(Error::data_format(
                path,
                format!(
                    "footer covers {running_count} rows, {remaining} of the requested {limit} rows from {start} are missing"
                ),
            ));
        }

        if windows.is_empty() {
            let schema = match &self.metadata.schema {
                Some(schema) => Arc::clone(schema),
                None => footer_schema(
                    self.fs,
                    stream,
                    path,
                    &mut self.scratch,
                    &mut self.footer_schema,
                )?,
            };
            windows.push(BatchWindow::empty(schema));
            stats.empty_results += 1;
        }
        stats.rows_returned = limit;

        tracing::debug!(
            path = %path.display(),
            start,
            limit,
            windows = windows.len(),
            decoded = stats.batches_decoded,
            skipped = stats.batches_skipped,
            "read row range"
        );
        self.stats.merge(&stats);
        Ok(windows)
    }

    /// Read rows `[start, start + limit)` into typed records.
    ///
    /// # Errors
    /// Fails like [`read`](Self::read), or with [`Error::Rows`] if a window cannot
    /// be converted to `T`.
    #[cfg(feature = "typed-rows")]
    pub fn read_rows<T: serde::de::DeserializeOwned>(
        &mut self,
        start: u64,
        limit: u64,
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for window in self.read(start, limit)? {
            out.append(&mut window.to_rows()?);
        }
        Ok(out)
    }

    /// Release the stream. Calling it again, or on a reader that never read, is a no-op.
    pub fn close(&mut self) {
        if let StreamState::Open(stream) = std::mem::replace(&mut self.state, StreamState::Closed) {
            drop(stream);
            tracing::debug!(path = %self.path.display(), "closed batch file");
        }
    }

    fn ensure_open(&mut self) -> Result<()> {
        match self.state {
            StreamState::Open(_) => Ok(()),
            StreamState::Closed => Err(Error::Closed {
                path: self.path.clone(),
            }),
            StreamState::Unopened => {
                let stream = self.open()?;
                self.state = StreamState::Open(stream);
                Ok(())
            }
        }
    }

    fn open(&mut self) -> Result<Box<dyn SeekableStream>> {
        tracing::debug!(
            path = %self.path.display(),
            validate_framing = self.config.validate_framing,
            "opening batch file"
        );
        let mut stream = self.fs.open(&self.path).at(&self.path)?;

        if self.config.validate_framing {
            let size = self.fs.attributes(&self.path).at(&self.path)?.size;
            framing::validate_framing(stream.as_mut(), size, &self.path, &mut self.scratch)?;
        }
        Ok(stream)
    }
}

impl<F: FileSystem + ?Sized> Drop for BatchFileReader<'_, F> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Validate `[start, start + limit)` against the file's record count.
fn check_range(record_count: u64, start: u64, limit: u64) -> Result<()> {
    if !((start == 0 && record_count == 0) || start < record_count) {
        return Err(Error::InvalidArgument(format!(
            "invalid start index ({start}), record count in file ({record_count})"
        )));
    }
    match start.checked_add(limit) {
        Some(end) if end <= record_count => Ok(()),
        _ => Err(Error::InvalidArgument(format!(
            "invalid start index ({start}) and limit ({limit}) combination, record count in file ({record_count})"
        ))),
    }
}

fn to_index(value: u64, path: &Path) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::data_format(path, format!("row index {value} does not fit in memory")))
}

/// Schema stored in the footer, read on first use and kept in `cache`.
fn footer_schema<F: FileSystem + ?Sized>(
    fs: &F,
    stream: &mut dyn SeekableStream,
    path: &Path,
    scratch: &mut [u8; FOOTER_OFFSET_SIZE],
    cache: &mut Option<SchemaRef>,
) -> Result<SchemaRef> {
    if let Some(schema) = cache {
        return Ok(Arc::clone(schema));
    }
    let size = fs.attributes(path).at(path)?.size;
    let (schema, _) = framing::read_footer(stream, size, path, scratch)?;
    tracing::debug!(path = %path.display(), "schema for empty result read from footer");
    Ok(Arc::clone(cache.insert(schema)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_accepts_zero_start() {
        assert!(check_range(0, 0, 0).is_ok());
        assert!(check_range(0, 0, 1).unwrap_err().is_invalid_argument());
        assert!(check_range(0, 1, 0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn start_must_be_inside_file() {
        assert!(check_range(10, 9, 1).is_ok());
        assert!(check_range(10, 10, 0).is_err());
        assert!(check_range(10, 3, 8).is_err());
        assert!(check_range(10, 3, 7).is_ok());
    }

    #[test]
    fn overflowing_range_is_rejected() {
        assert!(check_range(10, 5, u64::MAX).unwrap_err().is_invalid_argument());
    }
}
