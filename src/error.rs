//! Error types for batch file reads.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. The variants
//! split failures by who has to act on them:
//!
//! - [`Error::InvalidArgument`] -> caller bug (bad row range), never retried
//! - [`Error::DataFormat`] -> the file is corrupt or was not written by a compatible writer
//! - [`Error::Io`] -> the underlying stream failed; retry policy belongs to the caller
//! - [`Error::Closed`] -> the reader was used after [`close`](crate::BatchFileReader::close)

use std::path::{Path, PathBuf};

/// Unified error type for batch file reads.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested row range is not valid for the file.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The file bytes do not match the expected layout.
    #[error("data format error in {}: {message}", path.display())]
    DataFormat {
        /// Resolved path of the offending file.
        path: PathBuf,
        /// What was wrong, including the offending values.
        message: String,
    },

    /// An I/O error occurred while opening, seeking or reading the file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Resolved path of the file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The reader has already been closed.
    #[error("reader for {} is closed", path.display())]
    Closed {
        /// Resolved path of the file the reader was bound to.
        path: PathBuf,
    },

    /// Decoded columns could not be converted into typed rows.
    #[cfg(feature = "typed-rows")]
    #[error("row conversion failed: {0}")]
    Rows(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn data_format(path: &Path, message: impl Into<String>) -> Self {
        Self::DataFormat {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error means the file itself is unreadable.
    #[must_use]
    pub fn is_data_format(&self) -> bool {
        matches!(self, Self::DataFormat { .. })
    }

    /// Whether this error was caused by the caller's arguments.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Attach a path to a raw `std::io::Result`.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}
