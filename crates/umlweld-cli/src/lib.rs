//! CLI logic for the umlweld diagram tool.
//!
//! This module contains the core CLI logic for the umlweld diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Mode};

use std::{
    fs,
    io::{self, Write},
};

use log::{info, warn};

use umlweld::{
    DiagramPipeline, RenderMode, WeldError,
    config::{AppConfig, RenderConfig},
};

/// Run the umlweld CLI application
///
/// This function parses every input file, sums multiple inputs into one
/// diagram, renders it in the selected mode, and writes the result to the
/// output file (or stdout for `-`).
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `WeldError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Rendering errors (strict mode)
pub fn run(args: &Args) -> Result<(), WeldError> {
    info!(
        inputs = args.inputs.len(),
        output_path = args.output;
        "Processing diagrams"
    );

    // Load configuration, then fold in the command-line overrides
    let app_config = config::load_config(args.config.as_ref())?;
    let render = app_config.render();
    let mode = args
        .mode
        .map(RenderMode::from)
        .unwrap_or_else(|| render.mode());
    let app_config = AppConfig::new(RenderConfig::new(
        mode,
        args.strict || render.strict(),
        args.ignore_non_fatal || render.ignore_non_fatal(),
    ));

    let pipeline = DiagramPipeline::new(app_config);

    // Parse each input independently, then sum
    let mut diagrams = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let source = fs::read_to_string(input)?;
        diagrams.push(pipeline.parse(&source)?);
    }
    let diagram = if diagrams.len() == 1 {
        diagrams.remove(0)
    } else {
        pipeline.merge(&diagrams)
    };

    let report = pipeline.render(&diagram, mode)?;
    for anomaly in report.errors() {
        warn!(fatal = anomaly.is_fatal(); "{anomaly}");
    }

    // Write output file, or stdout for `-`
    if args.output == "-" {
        io::stdout().write_all(report.text().as_bytes())?;
    } else {
        fs::write(&args.output, report.text())?;
        info!(output_file = args.output; "Diagram written");
    }

    Ok(())
}
