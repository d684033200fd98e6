//! Trailer and footer access.
//!
//! All functions take the caller's scratch buffer for the 8-byte footer offset
//! instead of allocating one per call.

use crate::error::{Error, IoResultExt, Result};
use crate::format::{
    FOOTER_OFFSET_SIZE, MAGIC, MAGIC_LENGTH, MIN_FILE_SIZE, StoredFooter, TRAILER_SIZE,
};
use crate::io::fs::SeekableStream;
use crate::metadata::FileFooter;
use arrow::datatypes::SchemaRef;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Check size, trailing magic and footer offset. Returns the footer offset.
///
/// Leaves the stream positioned at the end of the file.
pub(crate) fn validate_framing(
    stream: &mut dyn SeekableStream,
    size: u64,
    path: &Path,
    scratch: &mut [u8; FOOTER_OFFSET_SIZE],
) -> Result<u64> {
    check_min_size(size, path)?;

    let footer_offset = read_footer_offset(stream, size, path, scratch)?;

    let mut magic = [0u8; MAGIC_LENGTH];
    stream.read_exact(&mut magic).at(path)?;
    if &magic != MAGIC {
        tracing::warn!(path = %path.display(), "trailing magic word mismatch");
        return Err(Error::data_format(
            path,
            format!(
                "invalid magic word {:?}, file is not a batch file",
                String::from_utf8_lossy(&magic)
            ),
        ));
    }

    check_footer_offset(footer_offset, size, path)?;
    Ok(footer_offset)
}

/// Read and decode the footer located through the trailer.
///
/// The trailing magic word is not checked here; see [`validate_framing`].
pub(crate) fn read_footer(
    stream: &mut dyn SeekableStream,
    size: u64,
    path: &Path,
    scratch: &mut [u8; FOOTER_OFFSET_SIZE],
) -> Result<(SchemaRef, FileFooter)> {
    check_min_size(size, path)?;
    let footer_offset = read_footer_offset(stream, size, path, scratch)?;
    check_footer_offset(footer_offset, size, path)?;

    let len = usize::try_from(size - TRAILER_SIZE - footer_offset).map_err(|_| {
        Error::data_format(path, format!("footer at {footer_offset} is too large to load"))
    })?;
    let mut bytes = vec![0u8; len];
    stream.seek(SeekFrom::Start(footer_offset)).at(path)?;
    stream.read_exact(&mut bytes).at(path)?;

    StoredFooter::decode(&bytes).map_err(|message| Error::data_format(path, message))
}

/// Seek to the trailer and read the footer offset.
fn read_footer_offset(
    stream: &mut dyn SeekableStream,
    size: u64,
    path: &Path,
    scratch: &mut [u8; FOOTER_OFFSET_SIZE],
) -> Result<u64> {
    stream.seek(SeekFrom::Start(size - TRAILER_SIZE)).at(path)?;
    stream.read_exact(scratch).at(path)?;
    Ok(u64::from_le_bytes(*scratch))
}

fn check_min_size(size: u64, path: &Path) -> Result<()> {
    if size < MIN_FILE_SIZE {
        tracing::warn!(path = %path.display(), size, "file too small for a batch file");
        return Err(Error::data_format(
            path,
            format!("file is too small to be a batch file ({size} bytes, need at least {MIN_FILE_SIZE})"),
        ));
    }
    Ok(())
}

// Valid offsets lie between the leading magic word and the trailer.
fn check_footer_offset(footer_offset: u64, size: u64, path: &Path) -> Result<()> {
    if footer_offset < MAGIC_LENGTH as u64 || footer_offset >= size - TRAILER_SIZE {
        tracing::warn!(path = %path.display(), footer_offset, size, "footer offset out of bounds");
        return Err(Error::data_format(
            path,
            format!("invalid footer offset {footer_offset} for file of {size} bytes"),
        ));
    }
    Ok(())
}
