//! Specsync CLI Binary
//!
//! Command-line interface for hosted collection synchronization. This is
//! the only place that decides on process termination; everything below
//! returns errors as values.

use clap::Parser;
use specsync::logging;
use specsync::tooling::cli::{Cli, CliContext};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    // CLI flags take precedence over the loaded logging configuration.
    let mut logging_config = context.config().logging.clone();
    if let Some(level) = &cli.log_level {
        logging_config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging_config.format = format.clone();
    }
    if let Err(e) = logging::init_logging(Some(&logging_config)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    match context.execute(&cli.command).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.permission_hint() {
                eprintln!("Hint: {}", hint);
            }
            process::exit(1);
        }
    }
}
