//! `mdx index` command implementation.

use std::io::{self, Write};

use clap::Args;
use mdx_config::Config;

use super::open_processor;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Print the index instead of writing it.
    #[arg(long)]
    dry_run: bool,
}

impl IndexArgs {
    pub(crate) fn execute(self, config: &Config, output: &Output) -> Result<(), CliError> {
        let processor = open_processor(config);
        let index = processor.generate_index()?;

        if self.dry_run {
            let json = serde_json::to_string_pretty(&index)?;
            writeln!(io::stdout().lock(), "{json}")?;
            return Ok(());
        }

        processor.save_index(&index)?;
        output.done(&format!(
            "Generated index with {} posts and {} pages",
            index.posts.len(),
            index.pages.len()
        ));
        Ok(())
    }
}
