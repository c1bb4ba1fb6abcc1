//! Metadata enrichment.
//!
//! Keeps `date`, `reading_time` and `excerpt` in a document's header in sync
//! with its content. A missing date is filled from the file's modification
//! time; reading time and excerpt are recomputed on every run and written
//! only when they differ.

use chrono::{DateTime, Utc};
use mdx_meta::Value;
use mdx_renderer::DerivedMetadataCalculator;
use mdx_storage::Storage;

use crate::error::ContentError;

const DATE_KEY: &str = "date";
const READING_TIME_KEY: &str = "reading_time";
const EXCERPT_KEY: &str = "excerpt";

/// Updates derived header fields of stored documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetadataEnricher {
    calculator: DerivedMetadataCalculator,
}

impl MetadataEnricher {
    #[must_use]
    pub fn new(calculator: DerivedMetadataCalculator) -> Self {
        Self { calculator }
    }

    /// Enrich the document at `path`, writing it back only if a field changed.
    ///
    /// Returns whether the document was written.
    pub fn enrich(&self, storage: &dyn Storage, path: &str) -> Result<bool, ContentError> {
        let text = storage.read(path)?;
        let (mut meta, body) = mdx_meta::load(&text)?;

        let mut changed = Vec::new();

        if is_missing(meta.get(DATE_KEY)) {
            let date = format_date(storage.mtime(path)?);
            meta.set(DATE_KEY, date);
            changed.push(DATE_KEY);
        }

        let derived = self.calculator.compute(&body);
        let reading_time = u64::from(derived.reading_time);
        if meta.get_u64(READING_TIME_KEY) != Some(reading_time) {
            meta.set(READING_TIME_KEY, reading_time);
            changed.push(READING_TIME_KEY);
        }
        if meta.get_str(EXCERPT_KEY) != Some(derived.excerpt.as_str()) {
            meta.set(EXCERPT_KEY, derived.excerpt);
            changed.push(EXCERPT_KEY);
        }

        if changed.is_empty() {
            tracing::debug!(path, "Metadata up to date");
            return Ok(false);
        }

        storage.write(path, &mdx_meta::dump(&meta, &body)?)?;
        tracing::info!(path, fields = ?changed, "Enriched document metadata");
        Ok(true)
    }
}

/// Absent, null and blank values count as missing.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// UTC calendar date of a Unix timestamp, `YYYY-MM-DD`.
#[allow(clippy::cast_possible_truncation)]
fn format_date(mtime: f64) -> String {
    DateTime::<Utc>::from_timestamp(mtime.floor() as i64, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}
