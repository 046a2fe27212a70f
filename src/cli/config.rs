//! TOML configuration file support.
//!
//! Instead of repeating flags, settings can live in a config file:
//!
//! ```toml
//! # colcsv.toml
//! [csv]
//! delimiter = ";"
//! include_header = true
//! null_string = "NULL"
//! batch_size = 4096
//! max_scratch_bytes = 67108864
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use colcsv::writer::WriteOptions;

use super::CsvArgs;

/// Root configuration structure for colcsv.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// CSV output settings.
    #[serde(default)]
    pub csv: CsvConfig,
}

/// Settings for the CSV writer.
#[derive(Debug, Default, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter (one ASCII character).
    pub delimiter: Option<String>,

    /// Whether to write a header row.
    pub include_header: Option<bool>,

    /// Text written for null values.
    pub null_string: Option<String>,

    /// Rows formatted per chunk.
    pub batch_size: Option<usize>,

    /// Byte limit for formatting buffers per chunk.
    pub max_scratch_bytes: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Build write options: defaults, then the config file, then CLI flags.
    pub fn write_options(&self, args: &CsvArgs) -> Result<WriteOptions> {
        let mut options = WriteOptions::default();

        if let Some(delimiter) = &self.csv.delimiter {
            options.delimiter = parse_delimiter(delimiter)?;
        }
        if let Some(include_header) = self.csv.include_header {
            options.include_header = include_header;
        }
        if let Some(null_string) = &self.csv.null_string {
            options.null_string = null_string.clone();
        }
        if let Some(batch_size) = self.csv.batch_size {
            options.batch_size = batch_size;
        }
        if self.csv.max_scratch_bytes.is_some() {
            options.max_scratch_bytes = self.csv.max_scratch_bytes;
        }

        if let Some(delimiter) = args.delimiter {
            options.delimiter = parse_delimiter(&delimiter.to_string())?;
        }
        if args.no_header {
            options.include_header = false;
        }
        if let Some(null_string) = &args.null_string {
            options.null_string = null_string.clone();
        }
        if let Some(batch_size) = args.batch_size {
            options.batch_size = batch_size;
        }
        if args.max_scratch_bytes.is_some() {
            options.max_scratch_bytes = args.max_scratch_bytes;
        }

        options.validate()?;
        Ok(options)
    }
}

/// Accept a single ASCII character, or `\t` spelled out
fn parse_delimiter(text: &str) -> Result<u8> {
    match text {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match text.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => bail!("Delimiter must be a single ASCII character, got {:?}", text),
        },
    }
}
