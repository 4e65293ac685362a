//! CLI logic for the Fletch connector renderer.
//!
//! Loads configuration and a layout snapshot, draws the selected topology
//! variant over it and writes the result as SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use fletch::{FletchError, FlowchartBuilder, snapshot::LayoutSnapshot};

/// Run the Fletch CLI application
///
/// # Errors
///
/// Returns `FletchError` for:
/// - File I/O errors
/// - Configuration or snapshot parsing errors
/// - An unknown `--theme`
/// - A snapshot without the configured surface or container
pub fn run(args: &Args) -> Result<(), FletchError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing layout snapshot"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(variant) = &args.variant {
        app_config.render_mut().set_variant(variant);
    }

    let source = fs::read_to_string(&args.input)?;
    let mut snapshot = LayoutSnapshot::from_toml(&source, &args.input)?;
    snapshot.apply_theme(args.theme.as_deref())?;

    let builder = FlowchartBuilder::new(app_config);
    let svg = builder.render_svg(snapshot)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
