//! Main entry point for the fastq_metadata_template application.
//!
//! Asks for the run-wide metadata, scans a directory for paired FASTQ files
//! and writes `metadata.csv` with one row per sample.

// External Crate Imports
use anyhow::Result;
use clap::Parser;

// Local Imports
use fastq_metadata_template::cli::{run_cli, Cli};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger; warnings about skipped files show by default
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Run CLI
    run_cli(cli)
}
