//! Command-line client for the postcode source.
//!
//! Loads the code list through the same cache the server uses, which makes it
//! handy for checking a source before deploying it.
//!
//! # Usage
//!
//! ```bash
//! # Print the first 20 codes
//! cargo run --bin postcodes -- list --limit 20
//!
//! # Check a single code
//! cargo run --bin postcodes -- check 3000
//!
//! # Load the source and show cache statistics
//! cargo run --bin postcodes -- status
//!
//! # Show the effective configuration
//! cargo run --bin postcodes -- config
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; `POSTCODE_SOURCE` is required.

use postcode_cache::application::services::PostcodeService;
use postcode_cache::config::{self, Config, mask_connection_string};
use postcode_cache::server::build_postcode_service;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::Value;
use std::time::Instant;

/// CLI tool for inspecting the postcode source.
#[derive(Parser)]
#[command(name = "postcodes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print postal codes in source order
    List {
        /// Print at most this many codes
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Check whether a postal code exists
    Check {
        /// Postal code to look up
        code: String,
    },

    /// Load the source and print cache statistics
    Status,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;

    if let Commands::Config = cli.command {
        show_config(&config);
        return Ok(());
    }

    let service = build_postcode_service(&config)?;

    match cli.command {
        Commands::List { limit } => list_codes(&service, limit).await?,
        Commands::Check { code } => check_code(&service, code).await?,
        Commands::Status => show_status(&service).await?,
        Commands::Config => show_config(&config),
    }

    Ok(())
}

/// Prints codes, one per line, up to `limit`.
async fn list_codes(service: &PostcodeService, limit: Option<usize>) -> Result<()> {
    let codes = service
        .list_codes()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load postcodes: {:?}", e))?;

    let shown = limit.unwrap_or(codes.len()).min(codes.len());
    for code in &codes[..shown] {
        println!("{}", code);
    }

    if shown < codes.len() {
        println!(
            "{}",
            format!("... {} more", codes.len() - shown).bright_black()
        );
    }

    Ok(())
}

async fn check_code(service: &PostcodeService, code: String) -> Result<()> {
    let exists = service
        .code_exists(Some(&Value::String(code.clone())))
        .await
        .map_err(|e| anyhow::anyhow!("Lookup failed: {:?}", e))?;

    if exists {
        println!("{} {}", code.cyan().bold(), "exists".green());
    } else {
        println!("{} {}", code.cyan().bold(), "not found".red());
    }

    Ok(())
}

/// Loads the source once and prints what the cache holds.
///
/// # Output Format
///
/// ```text
/// Postcode cache
///
///   Source:     ./data/AU.txt (column 1)
///   State:      ready
///   Codes:      16874
///   Distinct:   3165
///   Load time:  412 ms
/// ```
async fn show_status(service: &PostcodeService) -> Result<()> {
    println!("{}", "Postcode cache".bright_blue().bold());
    println!();

    let started = Instant::now();
    service
        .list_codes()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load postcodes: {:?}", e))?;
    let elapsed = started.elapsed();

    let distinct = service
        .build_index()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to index postcodes: {:?}", e))?;

    let status = service.status();

    println!(
        "  {:<11} {}",
        "Source:".bright_white(),
        mask_connection_string(service.source_description()).cyan()
    );
    println!(
        "  {:<11} {}",
        "State:".bright_white(),
        format!("{:?}", status.state).to_lowercase().green()
    );
    println!(
        "  {:<11} {}",
        "Codes:".bright_white(),
        status.code_count.unwrap_or(0).to_string().bold()
    );
    println!(
        "  {:<11} {}",
        "Distinct:".bright_white(),
        distinct.to_string().bold()
    );
    println!(
        "  {:<11} {} ms",
        "Load time:".bright_white(),
        elapsed.as_millis()
    );
    println!();

    Ok(())
}

fn show_config(config: &Config) {
    println!("{}", "Configuration".bright_blue().bold());
    println!();
    println!(
        "  {:<16} {}",
        "Source:".bright_white(),
        mask_connection_string(&config.postcode_source).cyan()
    );
    println!("  {:<16} {}", "Column:".bright_white(), config.postcode_column);
    println!(
        "  {:<16} {}s",
        "Fetch timeout:".bright_white(),
        config.fetch_timeout_seconds
    );
    println!(
        "  {:<16} {}s",
        "Cache max-age:".bright_white(),
        config.cache_max_age_seconds
    );
    println!("  {:<16} {}", "Preload:".bright_white(), config.preload);
    println!("  {:<16} {}", "Listen:".bright_white(), config.listen_addr);
    println!();
}
