//! Testing utilities for batch file readers.
//!
//! This module lets tests (in this crate and downstream) produce batch files and
//! observe how a reader touches them:
//!
//! - **Fixtures**: [`BatchFileBuilder`] writes files in the on-disk layout,
//!   [`sample_schema`] and [`sample_batch`] build numbered rows
//! - **Mock I/O**: [`TempDirPath`], [`CountingFileSystem`] and corruption helpers
//! - **Assertions**: [`assert_windows_cover`] checks that windows reconstruct a row range
//!
//! # Quick Start
//!
//! ```
//! use ironbatch::*;
//! use ironbatch::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = TempDirPath::new()?;
//! let metadata = BatchFileBuilder::new(sample_schema())
//!     .batch(sample_batch(0..10))
//!     .batch(sample_batch(10..20))
//!     .write_metadata(dir.path(), "part-0.batch")?;
//!
//! let fs = LocalFileSystem;
//! let mut reader = BatchFileReader::new(&fs, dir.path(), &metadata);
//! let windows = reader.read(5, 10)?;
//! assert_windows_cover(&windows, 5, 10);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock_io;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use mock_io::*;
