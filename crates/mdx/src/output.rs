//! Terminal reporting for CLI commands.
//!
//! Everything goes to stderr so stdout stays clean for JSON.

use std::fmt::Display;

use console::{Style, Term};

/// Outcome of processing one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DocumentStatus {
    Updated,
    Unchanged,
    Failed,
}

impl DocumentStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Failed => "failed",
        }
    }
}

/// Per-status document counts for a batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) updated: usize,
    pub(crate) unchanged: usize,
    pub(crate) failed: usize,
}

/// Reports command progress on stderr.
pub(crate) struct Output {
    term: Term,
    updated: Style,
    failed: Style,
    category: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            updated: Style::new().green(),
            failed: Style::new().red(),
            category: Style::new().cyan().bold(),
        }
    }

    fn line(&self, line: &str) {
        let _ = self.term.write_line(line);
    }

    /// One document's result, with the error for failures.
    pub(crate) fn document(&self, status: DocumentStatus, path: &str, detail: Option<&str>) {
        let line = document_line(status, path, detail);
        match status {
            DocumentStatus::Updated => self.line(&self.updated.apply_to(line).to_string()),
            DocumentStatus::Unchanged => self.line(&line),
            DocumentStatus::Failed => self.line(&self.failed.apply_to(line).to_string()),
        }
    }

    /// Closing summary of a batch; red when anything failed.
    pub(crate) fn summary(&self, tally: Tally) {
        let line = summary_line(tally);
        let style = if tally.failed == 0 {
            &self.updated
        } else {
            &self.failed
        };
        self.line(&style.apply_to(line).to_string());
    }

    /// Component category header followed by its component names.
    pub(crate) fn category(&self, name: &str, components: &[String]) {
        let header = format!("{name} ({})", components.len());
        self.line(&self.category.apply_to(header).to_string());
        for component in components {
            self.line(&format!("  {component}"));
        }
    }

    /// A completed step.
    pub(crate) fn done(&self, msg: &str) {
        self.line(&self.updated.apply_to(msg).to_string());
    }

    /// Nothing to do.
    pub(crate) fn idle(&self, msg: &str) {
        self.line(msg);
    }

    /// Error that ends the command.
    pub(crate) fn fatal(&self, err: &dyn Display) {
        self.line(&self.failed.apply_to(format!("Error: {err}")).to_string());
    }
}

fn document_line(status: DocumentStatus, path: &str, detail: Option<&str>) -> String {
    let label = status.label();
    match detail {
        Some(detail) => format!("  {label:<9} {path}: {detail}"),
        None => format!("  {label:<9} {path}"),
    }
}

fn summary_line(tally: Tally) -> String {
    format!(
        "{} updated, {} unchanged, {} failed",
        tally.updated, tally.unchanged, tally.failed
    )
}
