//! MDX CLI - content pipeline front end.
//!
//! Provides commands for:
//! - `render`: Render one document and print the artifact as JSON
//! - `enrich`: Fill in date, reading time and excerpt headers
//! - `index`: Regenerate the content index
//! - `components`: List available components by category

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mdx_config::{CliSettings, Config};
use tracing_subscriber::EnvFilter;

use commands::{EnrichArgs, IndexArgs, RenderArgs};
use error::CliError;
use output::Output;

/// MDX - render and maintain MDX content.
#[derive(Parser)]
#[command(name = "mdx", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover mdx.toml).
    #[arg(short, long, global = true, env = "MDX_CONFIG")]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    /// Maximum excerpt length in characters (overrides config).
    #[arg(long, global = true)]
    excerpt_max_length: Option<usize>,

    /// Reading speed for reading time estimates (overrides config).
    #[arg(long, global = true)]
    words_per_minute: Option<u32>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document and print it as JSON.
    Render(RenderArgs),
    /// Update derived metadata of documents.
    Enrich(EnrichArgs),
    /// Regenerate the content index.
    Index(IndexArgs),
    /// List available components.
    Components,
}

impl Cli {
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content_dir.clone(),
            excerpt_max_length: self.excerpt_max_length,
            words_per_minute: self.words_per_minute,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.load_config()?;
        match self.command {
            Commands::Render(args) => args.execute(&config),
            Commands::Enrich(args) => args.execute(&config, output),
            Commands::Index(args) => args.execute(&config, output),
            Commands::Components => commands::components::execute(&config, output),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.execute(&output) {
        output.fatal(&err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mdx", "index", "--verbose", "--config", "site/mdx.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/mdx.toml")));
        assert!(matches!(cli.command, Commands::Index(_)));
    }

    #[test]
    fn test_enrich_paths_optional() {
        let cli = Cli::try_parse_from(["mdx", "enrich"]).unwrap();
        assert!(matches!(cli.command, Commands::Enrich(ref args) if args.paths.is_empty()));
    }
}
