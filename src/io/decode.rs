//! Decoding of a single record batch at a known offset.

use crate::error::{Error, IoResultExt, Result};
use crate::io::fs::SeekableStream;
use crate::metadata::BatchSummary;
use arrow::ipc::reader::StreamReader;
use arrow::record_batch::RecordBatch;
use std::io::{Seek, SeekFrom};
use std::path::Path;

/// Seek to `summary.offset` and decode the Arrow IPC stream stored there.
///
/// The stream is left positioned somewhere past the batch; callers seek
/// before every decode.
pub(crate) fn decode_batch_at(
    stream: &mut dyn SeekableStream,
    summary: &BatchSummary,
    path: &Path,
) -> Result<RecordBatch> {
    stream.seek(SeekFrom::Start(summary.offset)).at(path)?;

    let offset = summary.offset;
    let mut reader = StreamReader::try_new(&mut *stream, None)
        .map_err(|e| Error::data_format(path, format!("batch at offset {offset}: {e}")))?;

    match reader.next() {
        Some(Ok(batch)) => Ok(batch),
        Some(Err(e)) => Err(Error::data_format(
            path,
            format!("decode batch at offset {offset}: {e}"),
        )),
        None => Err(Error::data_format(
            path,
            format!("no record batch at offset {offset}"),
        )),
    }
}
