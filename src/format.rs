//! On-disk layout of a batch file.
//!
//! ```text
//! [ MAGIC ]
//! [ batch 0 ] [ batch 1 ] ... [ batch N-1 ]   one Arrow IPC stream per batch
//! [ footer ]                                   postcard-encoded StoredFooter
//! [ footer offset: u64 LE ]
//! [ MAGIC ]
//! ```
//!
//! Each batch is a complete Arrow IPC stream (schema message, one record batch
//! message, end-of-stream marker), so it can be decoded from its offset alone.
//! The footer stores the schema as a schema-only IPC stream next to the
//! `(offset, record_count)` list.

use crate::metadata::{BatchSummary, FileFooter};
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::ipc::reader::StreamReader;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Magic word written at both ends of every batch file.
pub const MAGIC: &[u8; MAGIC_LENGTH] = b"IRONBATCH1";

pub const MAGIC_LENGTH: usize = 10;

/// Width of the footer offset field in the trailer.
pub const FOOTER_OFFSET_SIZE: usize = 8;

/// Bytes after the footer: offset field plus trailing magic.
pub const TRAILER_SIZE: u64 = (MAGIC_LENGTH + FOOTER_OFFSET_SIZE) as u64;

/// Smallest file that can hold both magic words and the footer offset.
pub const MIN_FILE_SIZE: u64 = (2 * MAGIC_LENGTH + FOOTER_OFFSET_SIZE) as u64;

/// Serialized form of the footer.
#[derive(Serialize, Deserialize)]
pub(crate) struct StoredFooter {
    /// Schema-only Arrow IPC stream.
    pub(crate) schema: Vec<u8>,
    pub(crate) batches: Vec<BatchSummary>,
}

impl StoredFooter {
    pub(crate) fn decode(bytes: &[u8]) -> Result<(SchemaRef, FileFooter), String> {
        let stored: Self =
            postcard::from_bytes(bytes).map_err(|e| format!("malformed footer: {e}"))?;
        let schema =
            decode_schema(&stored.schema).map_err(|e| format!("malformed footer schema: {e}"))?;
        Ok((schema, FileFooter::new(stored.batches)))
    }
}

/// Decode a schema-only IPC stream.
pub(crate) fn decode_schema(bytes: &[u8]) -> Result<SchemaRef, ArrowError> {
    let reader = StreamReader::try_new(Cursor::new(bytes), None)?;
    Ok(reader.schema())
}
