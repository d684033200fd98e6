//! Filesystem seam used by the reader.
//!
//! The reader only needs two things from storage: a seekable byte stream and the
//! size of the file. [`LocalFileSystem`] provides both over `std::fs`; tests and
//! other storage backends implement [`FileSystem`] themselves.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// A readable, seekable byte stream. Dropping it releases the handle.
pub trait SeekableStream: Read + Seek + Send {}

impl<T: Read + Seek + Send> SeekableStream for T {}

/// Attributes of a stored file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileAttributes {
    /// File length in bytes.
    pub size: u64,
}

/// Storage backend able to open files for random access.
///
/// Implementations must be `Send + Sync`: one backend is shared by every
/// reader, including readers running on other threads.
pub trait FileSystem: Send + Sync {
    /// Open `path` for reading.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn SeekableStream>>;

    /// Look up the attributes of `path`.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be inspected.
    fn attributes(&self, path: &Path) -> std::io::Result<FileAttributes>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn SeekableStream>> {
        (**self).open(path)
    }

    fn attributes(&self, path: &Path) -> std::io::Result<FileAttributes> {
        (**self).attributes(path)
    }
}

/// [`FileSystem`] backed by the local disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn SeekableStream>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn attributes(&self, path: &Path) -> std::io::Result<FileAttributes> {
        let meta = std::fs::metadata(path)?;
        Ok(FileAttributes { size: meta.len() })
    }
}
