//! Per-reader read statistics.
//!
//! Every [`BatchFileReader`](crate::BatchFileReader) keeps a [`ReadStats`] that is
//! updated after each successful `read`. Failed reads leave it untouched.
//!
//! ```no_run
//! use ironbatch::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let fs = LocalFileSystem;
//! let metadata = FileMetadata::load(&fs, "data", "part-0.batch")?;
//! let mut reader = BatchFileReader::new(&fs, "data", &metadata);
//! reader.read(0, metadata.record_count)?;
//!
//! reader.stats().print();
//! reader.stats().save_to_file("read_stats.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Counters describing the work done by a reader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadStats {
    /// Successful `read` calls.
    pub reads: u64,
    /// Batches decoded from the stream.
    pub batches_decoded: u64,
    /// Non-empty batches passed over because they end before the requested start.
    pub batches_skipped: u64,
    /// Rows covered by the returned windows.
    pub rows_returned: u64,
    /// Reads answered with a synthesized zero-row window.
    pub empty_results: u64,
}

impl ReadStats {
    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &Self) {
        self.reads += other.reads;
        self.batches_decoded += other.batches_decoded;
        self.batches_skipped += other.batches_skipped;
        self.rows_returned += other.rows_returned;
        self.empty_results += other.empty_results;
    }

    /// All counters as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "reads": self.reads,
            "batches_decoded": self.batches_decoded,
            "batches_skipped": self.batches_skipped,
            "rows_returned": self.rows_returned,
            "empty_results": self.empty_results,
        })
    }

    /// Print the counters to stdout.
    pub fn print(&self) {
        println!("\n========== Read Stats ==========");
        println!("reads: {}", self.reads);
        println!("batches_decoded: {}", self.batches_decoded);
        println!("batches_skipped: {}", self.batches_skipped);
        println!("rows_returned: {}", self.rows_returned);
        println!("empty_results: {}", self.empty_results);
        println!("================================\n");
    }

    /// Save the counters as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_counters() {
        let mut a = ReadStats {
            reads: 1,
            batches_decoded: 2,
            batches_skipped: 3,
            rows_returned: 40,
            empty_results: 0,
        };
        let b = ReadStats {
            reads: 2,
            empty_results: 1,
            ..ReadStats::default()
        };
        a.merge(&b);
        assert_eq!(a.reads, 3);
        assert_eq!(a.empty_results, 1);
        assert_eq!(a.rows_returned, 40);
    }

    #[test]
    fn json_has_every_counter() {
        let v = ReadStats::default().to_json();
        for key in [
            "reads",
            "batches_decoded",
            "batches_skipped",
            "rows_returned",
            "empty_results",
        ] {
            assert_eq!(v[key], json!(0), "missing {key}");
        }
    }
}
