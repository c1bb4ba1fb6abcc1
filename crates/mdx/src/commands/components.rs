//! `mdx components` command implementation.

use mdx_config::Config;

use super::open_processor;
use crate::error::CliError;
use crate::output::Output;

/// List available components grouped by category.
pub(crate) fn execute(config: &Config, output: &Output) -> Result<(), CliError> {
    let registry = open_processor(config).available_components()?;

    for (category, names) in &registry {
        output.category(category, names);
    }
    Ok(())
}
