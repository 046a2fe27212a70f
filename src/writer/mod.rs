//! # CSV Writer Module
//!
//! This module drives the conversion of Arrow record batches into CSV text.
//!
//! ## Design Principles
//!
//! 1. **Streaming Architecture**: Batches are written one at a time and large
//!    batches are sliced into chunks, so memory is bounded by one chunk's
//!    formatted size rather than the size of the table.
//!
//! 2. **Whole Records Only**: Every column of a chunk is formatted before any
//!    of its rows is handed to the sink. A formatting failure never leaves a
//!    partial record in the output.
//!
//! 3. **Deterministic Output**: Rows keep source order, records always end in
//!    a single `\n`, and writing the same data twice yields identical bytes.
//!
//! 4. **Fail Fast**: The first error moves the writer to
//!    [`WriterState::Failed`]; there is no partial-success mode.

mod config;
mod error;
mod row;
mod stats;
mod writer_impl;


pub use config::{WriteOptions, DEFAULT_BATCH_SIZE, LINE_TERMINATOR};
pub use error::WriterError;
pub use row::RowAssembler;
pub use stats::WriterStats;
pub use writer_impl::{write_csv_batch, write_csv_table, AbortHandle, CsvWriter, WriterState};
