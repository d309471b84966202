//! Kiln CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, info};

use kiln_cli::{
    Args,
    error_adapter::{exit_code, render_report},
};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Kiln");
    debug!(args:?; "Parsed arguments");

    match kiln_cli::run(&args) {
        Ok(summary) => {
            println!("Rendered dashboards: {}", summary.rendered());
        }
        Err(err) => {
            // Reports go straight to stderr so they survive `--log-level off`.
            eprint!("{}", render_report(&err));
            process::exit(exit_code(&err));
        }
    }
}
