//! Command-line argument definitions for the Kiln CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the source and destination directories,
//! the optional configuration file and the logging verbosity.

use std::path::PathBuf;

use clap::Parser;

/// Render exported dashboards for file provisioning
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source directory containing *.json dashboards
    #[arg(long, value_name = "DIR")]
    pub src: PathBuf,

    /// Destination directory to write rendered *.json dashboards
    #[arg(long, value_name = "DIR")]
    pub dest: PathBuf,

    /// Delete existing *.json in destination first
    #[arg(long)]
    pub clean: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
