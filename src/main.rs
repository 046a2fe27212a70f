//! # colcsv
//!
//! A command-line tool for converting columnar data files to CSV.
//!
//! ## Usage
//!
//! ```bash
//! # Convert a Parquet file to CSV
//! colcsv convert input.parquet output.csv
//!
//! # Semicolon-delimited, no header, NULL for missing values
//! colcsv convert input.parquet -d ';' --no-header --null-string NULL
//!
//! # Show how each column will be written
//! colcsv schema input.parquet
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
