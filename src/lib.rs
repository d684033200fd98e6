//! # Ironbatch
//!
//! A **random-access reader** for files that store a columnar dataset as a
//! sequence of self-contained Arrow record batches, indexed by a trailing footer.
//! Given a logical row range, the reader decodes only the batches that overlap
//! it and trims the first and last one to the exact row boundaries.
//!
//! ## Key Features
//!
//! - **Range reads** - `read(start, limit)` touches only the batches it needs
//! - **Exact windows** - results are [`BatchWindow`]s whose row ranges concatenate
//!   to exactly the requested rows
//! - **Never empty** - an empty range or empty file yields one zero-row window
//!   carrying the file schema
//! - **Framing validation** - optional magic word and footer offset checks
//! - **Pluggable storage** - any [`FileSystem`] able to open a seekable stream
//! - **Parallel reads** - one reader per range on rayon (feature `parallel-io`)
//! - **Typed rows** - decode windows into `Vec<T>` via `serde_arrow` (feature `typed-rows`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use ironbatch::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let fs = LocalFileSystem;
//! let metadata = FileMetadata::load(&fs, "/data/results", "job-17.batch")?;
//!
//! let mut reader = BatchFileReader::new(&fs, "/data/results", &metadata);
//! let windows = reader.read(1_000, 250)?;
//! let rows = concat_windows(&windows)?;
//! reader.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## File Layout
//!
//! ```text
//! [ MAGIC ][ batch 0 ] ... [ batch N-1 ][ footer ][ footer offset: u64 LE ][ MAGIC ]
//! ```
//!
//! See [`format`] for details. Files are produced by a writer outside this crate;
//! [`testing::BatchFileBuilder`] writes the same layout for tests.
//!
//! ## Module Overview
//!
//! - [`io`] - storage seam, framing checks, the range reader and parallel reads
//! - [`metadata`] - footer index and file metadata
//! - [`window`] - decoded batches with their selected row range
//! - [`config`] - reader options
//! - [`error`] - error taxonomy
//! - [`metrics`] - per-reader read statistics
//! - [`testing`] - fixtures, mock I/O and assertions for tests

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod metadata;
pub mod metrics;
pub mod testing;
pub mod window;

// General re-exports
pub use config::ReaderConfig;
pub use error::{Error, Result};
pub use io::fs::{FileAttributes, FileSystem, LocalFileSystem, SeekableStream};
pub use io::reader::BatchFileReader;
pub use metadata::{BatchSummary, FileFooter, FileMetadata};
pub use metrics::ReadStats;
pub use window::{BatchWindow, concat_windows};

// Gated re-exports
#[cfg(feature = "parallel-io")]
pub use io::parallel::{read_ranges_par, split_rows};
