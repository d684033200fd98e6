//! Mock I/O helpers: temporary directories, an instrumented filesystem, and
//! helpers that damage batch files in controlled ways.

use crate::format::{MAGIC_LENGTH, TRAILER_SIZE};
use crate::io::fs::{FileAttributes, FileSystem, LocalFileSystem, SeekableStream};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Scratch directory for batch files, removed with everything in it on drop.
pub struct TempDirPath {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().to_path_buf();
        Ok(Self { _dir: dir, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `name` joined onto the directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// [`FileSystem`] wrapper that counts how the reader uses storage.
///
/// Clones share their counters, so a test can keep one handle while the
/// reader borrows another.
#[derive(Clone, Debug, Default)]
pub struct CountingFileSystem<F = LocalFileSystem> {
    inner: F,
    opens: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    attribute_calls: Arc<AtomicUsize>,
}

impl<F: FileSystem> CountingFileSystem<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            opens: Arc::default(),
            releases: Arc::default(),
            attribute_calls: Arc::default(),
        }
    }

    /// Streams opened so far.
    #[must_use]
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Streams dropped so far.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Streams currently open.
    #[must_use]
    pub fn open_streams(&self) -> usize {
        self.opens() - self.releases()
    }

    #[must_use]
    pub fn attribute_calls(&self) -> usize {
        self.attribute_calls.load(Ordering::SeqCst)
    }
}

impl<F: FileSystem> FileSystem for CountingFileSystem<F> {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn SeekableStream>> {
        let inner = self.inner.open(path)?;
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountedStream {
            inner,
            releases: Arc::clone(&self.releases),
        }))
    }

    fn attributes(&self, path: &Path) -> std::io::Result<FileAttributes> {
        self.attribute_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.attributes(path)
    }
}

struct CountedStream {
    inner: Box<dyn SeekableStream>,
    releases: Arc<AtomicUsize>,
}

impl Read for CountedStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for CountedStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl Drop for CountedStream {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

fn overwrite_at(path: &Path, pos: SeekFrom, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = OpenOptions::new().read(true).write(true).open(path)?;
    f.seek(pos)?;
    f.write_all(bytes)?;
    f.flush()
}

/// Replace the trailing magic word of a batch file with garbage.
///
/// # Errors
/// Returns an error if the file cannot be opened or written.
pub fn corrupt_trailing_magic(path: impl AsRef<Path>) -> std::io::Result<()> {
    let garbage = [b'X'; MAGIC_LENGTH];
    overwrite_at(path.as_ref(), SeekFrom::End(-(MAGIC_LENGTH as i64)), &garbage)
}

/// Replace the footer offset stored in the trailer.
///
/// # Errors
/// Returns an error if the file cannot be opened or written.
pub fn overwrite_footer_offset(path: impl AsRef<Path>, footer_offset: u64) -> std::io::Result<()> {
    overwrite_at(
        path.as_ref(),
        SeekFrom::End(-(TRAILER_SIZE as i64)),
        &footer_offset.to_le_bytes(),
    )
}

/// Overwrite bytes starting at `offset`, e.g. to damage a batch.
///
/// # Errors
/// Returns an error if the file cannot be opened or written.
pub fn overwrite_bytes(path: impl AsRef<Path>, offset: u64, bytes: &[u8]) -> std::io::Result<()> {
    overwrite_at(path.as_ref(), SeekFrom::Start(offset), bytes)
}

/// Cut the file down to `len` bytes.
///
/// # Errors
/// Returns an error if the file cannot be opened or resized.
pub fn truncate_file(path: impl AsRef<Path>, len: u64) -> std::io::Result<()> {
    OpenOptions::new().write(true).open(path)?.set_len(len)
}
