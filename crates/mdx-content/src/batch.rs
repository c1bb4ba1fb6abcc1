//! Parallel processing of many documents with per-document failures.

use rayon::prelude::*;

use crate::error::ContentError;
use crate::processor::{ContentProcessor, LoadedDocument};

/// Outcome of a batch: what worked and which paths failed with what error.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<(String, ContentError)>,
}

impl<T> BatchReport<T> {
    /// Split results, keeping input order within each list.
    fn from_results(results: Vec<(String, Result<T, ContentError>)>) -> Self {
        let mut succeeded = Vec::with_capacity(results.len());
        let mut failed = Vec::new();

        for (path, result) in results {
            match result {
                Ok(value) => succeeded.push(value),
                Err(error) => {
                    tracing::warn!(path = %path, error = %error, "Document failed");
                    failed.push((path, error));
                }
            }
        }

        Self { succeeded, failed }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of enriching one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichOutcome {
    pub path: String,
    /// Whether the document was rewritten.
    pub changed: bool,
}

impl ContentProcessor {
    /// Load and render every path on the rayon pool.
    ///
    /// Each document gets its own conversion state, so results do not depend
    /// on scheduling.
    pub fn render_all(&self, paths: &[String]) -> BatchReport<LoadedDocument> {
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| (path.clone(), self.load_document(path)))
            .collect();
        let report = BatchReport::from_results(results);
        tracing::info!(
            rendered = report.succeeded.len(),
            failed = report.failed.len(),
            "Rendered documents"
        );
        report
    }

    /// Enrich every path on the rayon pool.
    pub fn enrich_all(&self, paths: &[String]) -> BatchReport<EnrichOutcome> {
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| {
                let outcome = self.enrich(path).map(|changed| EnrichOutcome {
                    path: path.clone(),
                    changed,
                });
                (path.clone(), outcome)
            })
            .collect();
        let report = BatchReport::from_results(results);
        tracing::info!(
            changed = report.succeeded.iter().filter(|o| o.changed).count(),
            unchanged = report.succeeded.iter().filter(|o| !o.changed).count(),
            failed = report.failed.len(),
            "Enriched documents"
        );
        report
    }
}
