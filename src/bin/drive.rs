//! Drive CLI Binary
//!
//! Command-line interface for inspecting and editing drive documents.

use anyhow::Context;
use blossom_drive::logging::init_logging;
use blossom_drive::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let context =
        CliContext::new(cli.config.clone()).context("Error loading configuration")?;

    let mut logging = context.config().logging.clone();
    if let Some(level) = cli.log_level.clone() {
        logging.level = level;
    }
    init_logging(Some(&logging)).context("Error initializing logging")?;

    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
