//! Command-line argument definitions for the umlweld CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the render mode,
//! execution flags, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

use umlweld::RenderMode;

/// How to render the parsed diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Re-render every declaration, duplicates kept.
    Reconstruct,
    /// Merge repeated declarations before rendering.
    Deduplicate,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Reconstruct => RenderMode::Reconstruct,
            Mode::Deduplicate => RenderMode::Deduplicate,
        }
    }
}

/// Command-line arguments for the umlweld diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Paths to the input PlantUML files; several inputs are summed into
    /// one diagram before rendering
    #[arg(required = true, help = "Paths to the input files")]
    pub inputs: Vec<String>,

    /// Path to the output file, or `-` for stdout
    #[arg(short, long, default_value = "-")]
    pub output: String,

    /// Render mode; defaults to the configured mode
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Abort on the first anomaly instead of collecting them
    #[arg(long)]
    pub strict: bool,

    /// Render best-effort without recording non-fatal anomalies
    #[arg(long)]
    pub ignore_non_fatal: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
