//! mdshelf - companion tooling for an offline-first Markdown reading app.
//!
//! Two jobs: regenerate the navigation index the viewer fetches
//! (`mdshelf index`), and preview the site through the same cache
//! arbitration the deployed service worker applies (`mdshelf serve`).

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod index;
mod logger;
mod utils;
mod worker;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{ShelfConfig, init_config};

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

    let config = init_config(ShelfConfig::load(cli)?);

    match &cli.command {
        Commands::Init { .. } => cli::init::new_project(&config),
        Commands::Index { .. } => cli::index::run_index(&config),
        Commands::Serve { .. } => cli::serve::serve(&config),
    }
}
