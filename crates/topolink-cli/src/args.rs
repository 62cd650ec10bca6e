//! Command-line argument definitions for the Topolink CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, alignment and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Topolink drawing tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input drawing description (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the resolved-coordinates report
    #[arg(short, long, default_value = "report.txt")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Align every element before writing the report
    #[arg(long)]
    pub align: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
