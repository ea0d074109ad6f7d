//! deschema - strip structured data (microdata, RDFa, JSON-LD) from rendered HTML.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod integration;
mod logger;
mod strip;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(SiteConfig::load(cli)?);

    match &cli.command {
        Commands::Strip { args } => cli::strip::run_strip(args, &config),
        Commands::Scan { args } => cli::scan::run_scan(args, &config),
        Commands::Serve { .. } => cli::serve::serve(),
    }
}
