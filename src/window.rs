//! Decoded batches paired with the row sub-range a read asked for.

use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

/// A decoded batch and the half-open row range `[start, end)` selected from it.
///
/// Invariant: `start <= end <= batch.num_rows()`.
#[derive(Clone, Debug)]
pub struct BatchWindow {
    batch: RecordBatch,
    start: usize,
    end: usize,
}

impl BatchWindow {
    /// Pair `batch` with `[start, end)`; `None` if the range is outside the batch.
    #[must_use]
    pub fn try_new(batch: RecordBatch, start: usize, end: usize) -> Option<Self> {
        (start <= end && end <= batch.num_rows()).then_some(Self { batch, start, end })
    }

    /// A window over a zero-row batch of `schema`.
    #[must_use]
    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            batch: RecordBatch::new_empty(schema),
            start: 0,
            end: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of selected rows.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The whole decoded batch, including rows outside the window.
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Zero-copy view of just the selected rows.
    #[must_use]
    pub fn slice(&self) -> RecordBatch {
        self.batch.slice(self.start, self.size())
    }

    /// Give up the window and keep the decoded batch.
    #[must_use]
    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Convert the selected rows into typed records with `serde_arrow`.
    ///
    /// # Errors
    /// Returns [`Error::Rows`](crate::Error::Rows) if the columns cannot be mapped onto `T`.
    #[cfg(feature = "typed-rows")]
    pub fn to_rows<T: serde::de::DeserializeOwned>(&self) -> crate::Result<Vec<T>> {
        let batch = self.slice();
        serde_arrow::from_record_batch(&batch).map_err(|e| crate::Error::Rows(e.to_string()))
    }
}

/// Concatenate the selected rows of every window into one batch.
///
/// Returns `Ok(None)` for an empty slice. The schema of the first window is used.
///
/// # Errors
/// Returns an error if the windows do not share a schema.
pub fn concat_windows(windows: &[BatchWindow]) -> Result<Option<RecordBatch>, ArrowError> {
    let Some(first) = windows.first() else {
        return Ok(None);
    };
    let slices: Vec<RecordBatch> = windows.iter().map(BatchWindow::slice).collect();
    concat_batches(&first.schema(), &slices).map(Some)
}
