use std::fmt;

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of record batches written
    pub batches_written: usize,
    /// Number of data rows written (header excluded)
    pub rows_written: usize,
    /// Bytes handed to the sink, header included
    pub bytes_written: u64,
    /// Whether a header row was emitted
    pub header_written: bool,
    /// High-water mark of formatting scratch memory in bytes: formatted
    /// columns plus per-cell text. The single-record row buffer is not
    /// counted.
    pub peak_scratch_bytes: usize,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows from {} batches ({} bytes{})",
            self.rows_written,
            self.batches_written,
            self.bytes_written,
            if self.header_written { ", with header" } else { "" }
        )
    }
}
