//! Fixture files and sample data.
//!
//! [`BatchFileBuilder`] is a test writer: it lays batches out exactly as the
//! reader expects so tests can exercise real files.

use crate::format::{MAGIC, StoredFooter};
use crate::metadata::{BatchSummary, FileFooter, FileMetadata};
use anyhow::{Context, Result, anyhow};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

/// Schema of [`sample_batch`]: a non-null `id` and a nullable `name`.
#[must_use]
pub fn sample_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
    ]))
}

/// A batch with one row per id in `ids`; every third row has a null name.
///
/// # Panics
/// Never for the fixed sample schema.
#[must_use]
pub fn sample_batch(ids: Range<i64>) -> RecordBatch {
    let names: StringArray = ids
        .clone()
        .map(|i| (i % 3 != 0).then(|| format!("row-{i}")))
        .collect();
    RecordBatch::try_new(
        sample_schema(),
        vec![Arc::new(Int64Array::from_iter_values(ids)), Arc::new(names)],
    )
    .expect("sample batch matches sample schema")
}

/// Writes batch files for tests.
///
/// # Example
///
/// ```
/// use ironbatch::testing::*;
///
/// let (bytes, footer) = BatchFileBuilder::new(sample_schema())
///     .batch(sample_batch(0..4))
///     .empty_batch()
///     .batch(sample_batch(4..6))
///     .to_bytes()
///     .unwrap();
/// assert_eq!(footer.batches.len(), 3);
/// assert_eq!(footer.record_count(), 6);
/// assert!(bytes.starts_with(b"IRONBATCH1"));
/// ```
#[derive(Clone, Debug)]
pub struct BatchFileBuilder {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl BatchFileBuilder {
    #[must_use]
    pub fn new(schema: SchemaRef) -> Self {
        Self {
            schema,
            batches: Vec::new(),
        }
    }

    /// Append a batch. It must use the builder's schema.
    #[must_use]
    pub fn batch(mut self, batch: RecordBatch) -> Self {
        self.batches.push(batch);
        self
    }

    /// Append a zero-row batch; it is written out but indexed with a zero count.
    #[must_use]
    pub fn empty_batch(mut self) -> Self {
        self.batches.push(RecordBatch::new_empty(self.schema.clone()));
        self
    }

    /// Append one batch per range, using [`sample_batch`].
    #[must_use]
    pub fn sample_batches(mut self, ranges: impl IntoIterator<Item = Range<i64>>) -> Self {
        self.batches.extend(ranges.into_iter().map(sample_batch));
        self
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Encode the whole file in memory.
    ///
    /// # Errors
    /// Returns an error if a batch does not match the schema or encoding fails.
    pub fn to_bytes(&self) -> Result<(Vec<u8>, FileFooter)> {
        let mut out = MAGIC.to_vec();
        let mut summaries = Vec::with_capacity(self.batches.len());

        for (i, batch) in self.batches.iter().enumerate() {
            let offset = out.len() as u64;
            {
                let mut writer = StreamWriter::try_new(&mut out, &self.schema)
                    .with_context(|| format!("create IPC writer for batch #{i}"))?;
                writer
                    .write(batch)
                    .with_context(|| format!("write batch #{i}"))?;
                writer.finish().with_context(|| format!("finish batch #{i}"))?;
            }
            summaries.push(BatchSummary::new(offset, batch.num_rows() as u64));
        }

        append_footer(&mut out, &self.schema, &summaries)?;
        Ok((out, FileFooter::new(summaries)))
    }

    /// Write the file to `path`, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if encoding fails or the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<FileFooter> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
        let (bytes, footer) = self.to_bytes()?;
        let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        f.write_all(&bytes)
            .with_context(|| format!("write {}", path.display()))?;
        f.flush()?;
        Ok(footer)
    }

    /// Write `base_path/name` and return metadata for it, schema included.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_metadata(&self, base_path: impl AsRef<Path>, name: &str) -> Result<FileMetadata> {
        let footer = self.write(base_path.as_ref().join(name))?;
        Ok(FileMetadata::new(name, footer, Some(self.schema.clone())))
    }
}

/// Write a file holding only the leading magic, a footer listing `summaries`
/// and the trailer. No batch bodies are written, so the index can claim anything.
///
/// # Errors
/// Returns an error if encoding fails or the file cannot be written.
pub fn write_index_only(
    path: impl AsRef<Path>,
    schema: &Schema,
    summaries: &[BatchSummary],
) -> Result<()> {
    let path = path.as_ref();
    let mut out = MAGIC.to_vec();
    append_footer(&mut out, schema, summaries)?;
    std::fs::write(path, &out).with_context(|| format!("write {}", path.display()))
}

fn append_footer(out: &mut Vec<u8>, schema: &Schema, summaries: &[BatchSummary]) -> Result<()> {
    let footer_offset = out.len() as u64;
    let stored = StoredFooter {
        schema: encode_schema(schema)?,
        batches: summaries.to_vec(),
    };
    let footer_bytes = postcard::to_allocvec(&stored).map_err(|e| anyhow!("encode footer: {e}"))?;
    out.extend_from_slice(&footer_bytes);
    out.extend_from_slice(&footer_offset.to_le_bytes());
    out.extend_from_slice(MAGIC);
    Ok(())
}

fn encode_schema(schema: &Schema) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, schema).context("create schema writer")?;
        writer.finish().context("finish schema stream")?;
    }
    Ok(buf)
}
