use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `forma` binary.
#[derive(Debug, Parser)]
#[command(name = "forma", version, about = "Forma - form schemas with derived fields")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw (defaults to `general.output_format`)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding saved forms (overrides `storage.dir`)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolve global flags, taking the output format from config unless
    /// `--format` was given.
    #[must_use]
    pub fn global_flags(&self, configured_format: &str) -> GlobalFlags {
        GlobalFlags {
            format: self
                .format
                .unwrap_or_else(|| OutputFormat::from_config(configured_format)),
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}
