//! Reader configuration.
//!
//! ```
//! use ironbatch::ReaderConfig;
//!
//! let config = ReaderConfig::from_json_str(r#"{ "validate_framing": true }"#).unwrap();
//! assert!(config.validate_framing);
//! assert!(config.verify_batch_row_counts);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling how a [`BatchFileReader`](crate::BatchFileReader) checks the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Check the file size, trailing magic word and footer offset when the file
    /// is opened. Off by default.
    pub validate_framing: bool,
    /// Reject a decoded batch whose row count differs from its footer summary.
    pub verify_batch_row_counts: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            validate_framing: false,
            verify_batch_row_counts: true,
        }
    }
}

impl ReaderConfig {
    /// Enable or disable framing validation.
    #[must_use]
    pub fn with_framing_validation(mut self, enabled: bool) -> Self {
        self.validate_framing = enabled;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON for this type.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse reader config")
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }
}
