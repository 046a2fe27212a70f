use anyhow::{Context, Result};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use colcsv::writer::CsvWriter;

use super::config::Config;
use super::CsvArgs;

/// Convert a Parquet file to CSV
pub fn run(input: PathBuf, output: Option<PathBuf>, args: CsvArgs) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let output = output.unwrap_or_else(|| input.with_extension("csv"));

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let options = config.write_options(&args)?;

    info!("colcsv - Parquet to CSV");
    info!("=======================");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Delimiter: {:?}", options.delimiter as char);
    info!("Header: {}", options.include_header);
    info!("Batch size: {}", options.batch_size);

    let file = File::open(&input).context("Failed to open input file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("Failed to read Parquet file")?;
    let schema = Arc::clone(builder.schema());
    let reader = builder
        .with_batch_size(options.batch_size)
        .build()
        .context("Failed to create Parquet reader")?;

    let mut writer = CsvWriter::new_file(&output, schema, options)
        .with_context(|| format!("Failed to create CSV writer for {}", output.display()))?;

    for (index, batch) in reader.enumerate() {
        let batch = batch.with_context(|| format!("Failed to decode record batch {index}"))?;
        debug!("Read batch {} ({} rows)", index, batch.num_rows());
        writer
            .write_batch(&batch)
            .with_context(|| format!("Failed to write record batch {index}"))?;
    }

    let stats = writer.finish().context("Failed to finalize CSV file")?;

    info!("Conversion complete!");
    info!("  Batches: {}", stats.batches_written);
    info!("  Rows: {}", stats.rows_written);
    info!(
        "  Output size: {} bytes ({:.2} MB)",
        stats.bytes_written,
        stats.bytes_written as f64 / 1024.0 / 1024.0
    );
    info!("  Peak scratch memory: {} bytes", stats.peak_scratch_bytes);

    Ok(())
}
