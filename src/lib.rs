//! # colcsv - Columnar Tables to CSV
//!
//! `colcsv` serializes Apache Arrow data (a [`Table`](table::Table) of record
//! batches, or a single [`RecordBatch`](arrow::record_batch::RecordBatch))
//! into CSV and streams it to any [`std::io::Write`] sink.
//!
//! ## Key Features
//!
//! - **Per-type formatting**: every Arrow type is classified into a closed set
//!   of column kinds. Numeric, boolean, decimal and temporal values use a
//!   locale-independent encoding; string and binary values are written
//!   byte-for-byte. Nested types (lists, structs, unions, maps) are rejected.
//!
//! - **Predictable quoting**: string and binary values are always quoted;
//!   plain values only when they contain the delimiter, a quote or a line
//!   break. Embedded quotes are doubled. Nulls are the bare null string.
//!
//! - **Bounded memory**: batches are formatted in chunks and every scratch
//!   buffer is charged to a per-write pool with an optional byte limit.
//!
//! - **Whole records only**: a chunk is fully formatted before any of its
//!   rows is written, and the first failure stops the write.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int32Array, StringArray};
//! use arrow::record_batch::RecordBatch;
//! use colcsv::writer::{write_csv_batch, WriteOptions};
//!
//! let batch = RecordBatch::try_from_iter(vec![
//!     ("col1", Arc::new(Int32Array::from(vec![1, 2])) as ArrayRef),
//!     ("col2", Arc::new(StringArray::from(vec![Some("a"), None])) as ArrayRef),
//! ])?;
//!
//! let mut out = Vec::new();
//! write_csv_batch(&batch, &WriteOptions::default(), &mut out)?;
//! assert_eq!(out, b"\"col1\",\"col2\"\n1,\"a\"\n2,\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Streaming Many Batches
//!
//! ```rust,no_run
//! use colcsv::writer::{CsvWriter, WriteOptions};
//! # fn batches() -> Vec<arrow::record_batch::RecordBatch> { vec![] }
//! # let schema = std::sync::Arc::new(arrow::datatypes::Schema::empty());
//!
//! let options = WriteOptions::new().with_delimiter(b';').with_null_string("NA");
//! let mut writer = CsvWriter::new_file("out.csv", schema, options)?;
//! for batch in batches() {
//!     writer.write_batch(&batch)?;
//! }
//! let stats = writer.finish()?;
//! println!("{stats}");
//! # Ok::<(), colcsv::writer::WriterError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`format`]: column kind dispatch, cell formatting, quoting, scratch pool
//! - [`writer`]: row assembly, the chunked writer state machine, options and
//!   errors
//! - [`table`]: a schema plus an ordered list of record batches

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod format;
pub mod table;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::format::{ColumnKind, TypeCategory};
    pub use crate::table::Table;
    pub use crate::writer::{
        write_csv_batch, write_csv_table, AbortHandle, CsvWriter, WriteOptions, WriterError,
        WriterState, WriterStats,
    };
}
