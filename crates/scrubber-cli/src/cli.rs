//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scrubber: run named transform pipelines over delimited files
#[derive(Parser)]
#[command(name = "scrubber")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a pipeline of transforms
    Run {
        /// Input file loaded before the first step (CSV/TSV)
        #[arg(short, long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// JSON pipeline file; its steps run before the positional ones
        #[arg(long, value_name = "FILE")]
        pipeline: Option<PathBuf>,

        /// Field delimiter (default: detected from the file)
        #[arg(short, long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Treat the first row as data; columns become column_1, column_2, ...
        #[arg(long)]
        no_header: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Steps, one quoted string each (e.g. "drop-column email")
        #[arg(value_name = "STEP")]
        steps: Vec<String>,
    },

    /// List available transforms and their parameters
    Transforms {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Accepts a single ASCII character, or `tab` / `\t`.
fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!(
                "Invalid delimiter: {}. Use a single ASCII character or 'tab'.",
                s
            )),
        },
    }
}
