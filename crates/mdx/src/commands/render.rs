//! `mdx render` command implementation.

use std::io::{self, Write};

use clap::Args;
use mdx_config::Config;

use super::open_processor;
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document path relative to the content directory (e.g. posts/hello.mdx).
    path: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self, config: &Config) -> Result<(), CliError> {
        let processor = open_processor(config);
        let document = processor.load_document(&self.path)?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}
