use arrow::datatypes::DataType;

/// Errors that can occur during a CSV write
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// A column has a type CSV cannot represent (lists, structs, unions, ...)
    #[error("Unsupported type for column '{column}': {data_type}")]
    UnsupportedType {
        /// Column name
        column: String,
        /// Offending Arrow type
        data_type: DataType,
    },

    /// Column count or column lengths do not line up
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A scratch buffer could not be allocated or would exceed its limit
    #[error("Allocation failure: could not reserve {requested} bytes{}", limit_suffix(.limit))]
    AllocationFailure {
        /// Bytes requested
        requested: usize,
        /// Configured limit, if the failure came from the limit
        limit: Option<usize>,
    },

    /// The output sink reported an error
    #[error("Sink write failure at batch {batch}{}: {source}", row_suffix(.row))]
    SinkWriteFailure {
        /// Index of the batch being written
        batch: usize,
        /// Index of the row within the batch (None for header and flush)
        row: Option<usize>,
        /// Error reported by the sink
        #[source]
        source: std::io::Error,
    },

    /// The write was aborted between batches
    #[error("Write aborted before batch {batch}")]
    Aborted {
        /// Index of the first batch not written
        batch: usize,
    },

    /// Options rejected by [`WriteOptions::validate`](super::WriteOptions::validate)
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The writer already failed or was closed
    #[error("Invalid writer state: {0}")]
    InvalidState(&'static str),

    /// I/O error opening an output file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),
}

fn limit_suffix(limit: &Option<usize>) -> String {
    limit
        .map(|l| format!(" (limit {l} bytes)"))
        .unwrap_or_default()
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(", row {r}")).unwrap_or_default()
}
