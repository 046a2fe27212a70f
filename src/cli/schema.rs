use anyhow::{Context, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::PathBuf;

use colcsv::format::ColumnKind;

/// Display how each column of a Parquet file will be written
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let handle = File::open(&file).context("Failed to open file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(handle).context("Failed to read Parquet file")?;
    let schema = builder.schema();

    println!("colcsv Column Layout");
    println!("====================");
    println!("File: {}", file.display());
    println!("Rows: {}", builder.metadata().file_metadata().num_rows());
    println!();

    let mut unsupported = 0;
    for (i, field) in schema.fields().iter().enumerate() {
        let category = match ColumnKind::of(field.name(), field.data_type()) {
            Ok(kind) => kind.category().to_string(),
            Err(_) => {
                unsupported += 1;
                "unsupported".to_string()
            }
        };
        println!(
            "  {:3}. {} ({}) -> {}",
            i + 1,
            field.name(),
            field.data_type(),
            category
        );
    }

    if unsupported > 0 {
        println!();
        println!("{unsupported} column(s) cannot be written as CSV");
    }

    Ok(())
}
