//! Parallel range reads, one reader (and one stream) per range.
//!
//! # Feature
//! Requires the `parallel-io` feature.

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::io::fs::FileSystem;
use crate::io::reader::BatchFileReader;
use crate::metadata::FileMetadata;
use crate::window::BatchWindow;
use rayon::prelude::*;
use std::path::Path;

/// Split `[0, record_count)` into contiguous `(start, limit)` ranges.
///
/// * `shards`: if `None`, defaults to `num_cpus::get()`, clamped to `[1, record_count]`.
///
/// An empty file yields the single range `(0, 0)`.
#[must_use]
pub fn split_rows(record_count: u64, shards: Option<usize>) -> Vec<(u64, u64)> {
    if record_count == 0 {
        return vec![(0, 0)];
    }
    let shards = u64::try_from(shards.unwrap_or_else(num_cpus::get).max(1))
        .unwrap_or(u64::MAX)
        .min(record_count);
    let chunk = record_count.div_ceil(shards);

    let mut ranges = Vec::with_capacity(usize::try_from(shards).unwrap_or_default());
    let mut start = 0u64;
    while start < record_count {
        let limit = chunk.min(record_count - start);
        ranges.push((start, limit));
        start += limit;
    }
    ranges
}

/// Read every `(start, limit)` range on the rayon pool.
///
/// Each range gets its own [`BatchFileReader`], so ranges never share a stream.
/// Results are returned in the order of `ranges`.
///
/// # Errors
/// Returns the first error any range produced; see [`BatchFileReader::read`].
pub fn read_ranges_par<F: FileSystem + ?Sized>(
    fs: &F,
    base_path: impl AsRef<Path>,
    metadata: &FileMetadata,
    config: &ReaderConfig,
    ranges: &[(u64, u64)],
) -> Result<Vec<Vec<BatchWindow>>> {
    let base_path = base_path.as_ref();
    ranges
        .par_iter()
        .map(|&(start, limit)| {
            let mut reader = BatchFileReader::with_config(fs, base_path, metadata, config.clone());
            let windows = reader.read(start, limit);
            reader.close();
            windows
        })
        .collect()
}
