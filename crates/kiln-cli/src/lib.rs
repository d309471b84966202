//! CLI logic for the Kiln dashboard renderer.
//!
//! This module contains the core CLI logic: load configuration, then render
//! every dashboard in the source directory into the destination directory.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::info;

use kiln::{DashboardRenderer, KilnError, RenderOptions, RenderSummary};

/// Run the Kiln CLI application
///
/// This function renders the dashboards in `args.src` into `args.dest`.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `KilnError` for:
/// - Configuration loading errors
/// - A missing source directory
/// - A source directory without dashboards
/// - The first dashboard that fails to render
pub fn run(args: &Args) -> Result<RenderSummary, KilnError> {
    info!(
        src = args.src.display().to_string(),
        dest = args.dest.display().to_string(),
        clean = args.clean;
        "Rendering dashboards for provisioning"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let renderer = DashboardRenderer::new(app_config);
    let options = RenderOptions::default().with_clean(args.clean);
    let summary = renderer.render_dir(&args.src, &args.dest, &options)?;

    info!(rendered = summary.rendered(); "Dashboards rendered successfully");

    Ok(summary)
}
