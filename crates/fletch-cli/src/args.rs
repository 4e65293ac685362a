//! Command-line argument definitions for the Fletch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the layout snapshot, the output path,
//! the configuration file, the topology variant and theme, and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the Fletch connector renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input layout snapshot (TOML)
    #[arg(help = "Path to the layout snapshot file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Topology variant to draw, overriding the configuration
    #[arg(long)]
    pub variant: Option<String>,

    /// Snapshot theme to apply before drawing
    #[arg(long)]
    pub theme: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
