//! Command-line tool for resolving annotated route tables into an API operation model.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-routes [OPTIONS] <ROUTES>
//! ```
//!
//! # Examples
//!
//! Resolve to YAML on stdout:
//! ```bash
//! openapi-from-routes routes.yml -s app/schemas -i app/includes
//! ```
//!
//! Resolve to a JSON file with verbose logging:
//! ```bash
//! openapi-from-routes routes.yml -f json -o operations.json -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_routes::cli;

fn main() -> Result<()> {
    // The verbose flag decides the log level, so parse before initializing the logger
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("openapi-from-routes starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("Operation model generation completed successfully");

    Ok(())
}
