use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod convert;
mod schema;

/// colcsv - Columnar data to CSV converter
#[derive(Parser)]
#[command(name = "colcsv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Flags that override the `[csv]` section of a config file
#[derive(clap::Args, Debug, Default)]
pub struct CsvArgs {
    /// Field delimiter (a single ASCII character)
    #[arg(short = 'd', long)]
    pub delimiter: Option<char>,

    /// Do not write a header row
    #[arg(long)]
    pub no_header: bool,

    /// Text written for null values
    #[arg(long, value_name = "TEXT")]
    pub null_string: Option<String>,

    /// Rows formatted per chunk
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// Byte limit for formatting buffers per chunk
    #[arg(long, value_name = "BYTES")]
    pub max_scratch_bytes: Option<usize>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Parquet file to CSV
    Convert {
        /// Input Parquet file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV file path (defaults to INPUT with a .csv extension)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Show each column of a Parquet file with its CSV category
    Schema {
        /// Input Parquet file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert { input, output, csv } => convert::run(input, output, csv),
        Commands::Schema { file } => schema::run(file),
    }
}
