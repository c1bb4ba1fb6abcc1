//! `mdx enrich` command implementation.

use clap::Args;
use mdx_config::Config;
use mdx_content::{BatchReport, DocumentKind, EnrichOutcome};

use super::open_processor;
use crate::error::CliError;
use crate::output::{DocumentStatus, Output, Tally};

/// Arguments for the enrich command.
#[derive(Args)]
pub(crate) struct EnrichArgs {
    /// Document paths relative to the content directory (default: all posts).
    pub(crate) paths: Vec<String>,
}

impl EnrichArgs {
    pub(crate) fn execute(self, config: &Config, output: &Output) -> Result<(), CliError> {
        let processor = open_processor(config);
        let paths = if self.paths.is_empty() {
            processor.document_paths(DocumentKind::Post)?
        } else {
            self.paths
        };

        if paths.is_empty() {
            output.idle("No documents to enrich");
            return Ok(());
        }

        let report = processor.enrich_all(&paths);
        print_report(output, &report);

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::DocumentsFailed(report.failed.len()))
        }
    }
}

fn print_report(output: &Output, report: &BatchReport<EnrichOutcome>) {
    let mut tally = Tally::default();
    for outcome in &report.succeeded {
        let status = if outcome.changed {
            tally.updated += 1;
            DocumentStatus::Updated
        } else {
            tally.unchanged += 1;
            DocumentStatus::Unchanged
        };
        output.document(status, &outcome.path, None);
    }
    for (path, error) in &report.failed {
        tally.failed += 1;
        output.document(DocumentStatus::Failed, path, Some(&error.to_string()));
    }
    output.summary(tally);
}
