use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{Fields, SchemaRef};
use arrow::record_batch::RecordBatch;
use log::{debug, info, warn};

use crate::format::{format_column, ColumnKind, FormattedColumn, ScratchPool};
use crate::table::Table;

use super::config::WriteOptions;
use super::error::WriterError;
use super::row::RowAssembler;
use super::stats::WriterStats;

/// Lifecycle of a [`CsvWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Nothing written yet
    Uninitialized,
    /// Header requested but not yet written
    HeaderPending,
    /// Accepting batches
    Streaming,
    /// Flushed; no more batches accepted
    Closed,
    /// A write failed; the sink content is not guaranteed to be parseable
    Failed,
}

/// Cloneable flag that stops a write at the next batch boundary
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Create a handle in the not-aborted state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the write to stop before its next batch
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether an abort was requested
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Streaming CSV writer for Arrow record batches.
///
/// Batches are written strictly in the order they are passed in, rows in
/// index order. Each batch is sliced into chunks of at most
/// [`WriteOptions::batch_size`] rows; all columns of a chunk are formatted
/// before any of its rows reaches the sink, so a formatting failure never
/// leaves a partial record behind.
pub struct CsvWriter<W: Write> {
    sink: W,
    schema: SchemaRef,
    kinds: Vec<ColumnKind>,
    options: WriteOptions,
    state: WriterState,
    assembler: RowAssembler,
    pool: ScratchPool,
    abort: Option<AbortHandle>,
    stats: WriterStats,
}

impl CsvWriter<BufWriter<File>> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        schema: SchemaRef,
        options: WriteOptions,
    ) -> Result<Self, WriterError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), schema, options)
    }
}

impl<W: Write> CsvWriter<W> {
    /// Create a new writer to any Write implementation.
    ///
    /// Fails if the options are invalid or a column of `schema` has a type
    /// that cannot be written as CSV.
    pub fn new(sink: W, schema: SchemaRef, options: WriteOptions) -> Result<Self, WriterError> {
        options.validate()?;
        let kinds = schema
            .fields()
            .iter()
            .map(|f| ColumnKind::of(f.name(), f.data_type()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sink,
            schema,
            kinds,
            assembler: RowAssembler::new(options.delimiter),
            pool: ScratchPool::new(options.max_scratch_bytes),
            options,
            state: WriterState::Uninitialized,
            abort: None,
            stats: WriterStats::default(),
        })
    }

    /// Check `handle` before every batch
    #[must_use]
    pub fn with_abort_handle(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Schema the header and column checks are based on
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Options of this write
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Statistics so far
    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    /// Write one record batch
    pub fn write_batch(&mut self, batch: &RecordBatch) -> Result<(), WriterError> {
        self.guarded(|w| w.write_arrays(batch.columns(), batch.num_rows()))
    }

    /// Write several record batches in order
    pub fn write_batches<'b, I>(&mut self, batches: I) -> Result<(), WriterError>
    where
        I: IntoIterator<Item = &'b RecordBatch>,
    {
        for batch in batches {
            self.write_batch(batch)?;
        }
        Ok(())
    }

    /// Write one batch given as bare columns.
    ///
    /// Column count and data types must match the schema, and every column
    /// must have the same length; otherwise the write fails with
    /// [`WriterError::SchemaMismatch`] before any row of this batch is written.
    pub fn write_columns(&mut self, columns: &[ArrayRef]) -> Result<(), WriterError> {
        let rows = columns.first().map_or(0, |c| c.len());
        self.guarded(|w| w.write_arrays(columns, rows))
    }

    /// Write any pending header, flush the sink and close the writer
    pub fn close(&mut self) -> Result<WriterStats, WriterError> {
        self.guarded(|w| {
            w.begin()?;
            let batch = w.stats.batches_written;
            w.sink
                .flush()
                .map_err(|source| WriterError::SinkWriteFailure {
                    batch,
                    row: None,
                    source,
                })?;
            w.state = WriterState::Closed;
            info!("{}", w.stats);
            Ok(w.stats.clone())
        })
    }

    /// Close the writer and return the final statistics
    pub fn finish(mut self) -> Result<WriterStats, WriterError> {
        self.close()
    }

    /// Close the writer (if still open) and hand back the sink
    pub fn into_inner(mut self) -> Result<(W, WriterStats), WriterError> {
        let stats = if self.state == WriterState::Closed {
            self.stats.clone()
        } else {
            self.close()?
        };
        Ok((self.sink, stats))
    }

    /// Run `op` unless the writer is terminal; any error makes it terminal
    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, WriterError>,
    ) -> Result<T, WriterError> {
        match self.state {
            WriterState::Failed => return Err(WriterError::InvalidState("writer has failed")),
            WriterState::Closed => return Err(WriterError::InvalidState("writer is closed")),
            _ => {}
        }
        let result = op(self);
        if result.is_err() {
            self.state = WriterState::Failed;
        }
        result
    }

    /// Leave the initial states, writing the header if requested
    fn begin(&mut self) -> Result<(), WriterError> {
        if self.state == WriterState::Uninitialized {
            self.state = if self.options.include_header {
                WriterState::HeaderPending
            } else {
                WriterState::Streaming
            };
        }
        if self.state == WriterState::HeaderPending {
            let header = self
                .assembler
                .assemble_header(self.schema.fields().iter().map(|f| f.name().as_str()));
            self.sink
                .write_all(header)
                .map_err(|source| WriterError::SinkWriteFailure {
                    batch: 0,
                    row: None,
                    source,
                })?;
            self.stats.bytes_written += header.len() as u64;
            self.stats.header_written = true;
            self.state = WriterState::Streaming;
        }
        Ok(())
    }

    fn write_arrays(&mut self, columns: &[ArrayRef], rows: usize) -> Result<(), WriterError> {
        let batch = self.stats.batches_written;
        if self.abort.as_ref().is_some_and(|h| h.is_aborted()) {
            warn!("CSV write aborted before batch {}", batch);
            return Err(WriterError::Aborted { batch });
        }

        self.check_columns(columns, rows)?;
        self.begin()?;

        let chunk_size = self.options.batch_size;
        let mut offset = 0;
        while offset < rows {
            let len = chunk_size.min(rows - offset);
            let chunk: Vec<ArrayRef> = columns.iter().map(|c| c.slice(offset, len)).collect();
            self.write_chunk(&chunk, batch, offset, len)?;
            offset += len;
        }

        self.stats.batches_written += 1;
        Ok(())
    }

    fn check_columns(&self, columns: &[ArrayRef], rows: usize) -> Result<(), WriterError> {
        let fields = self.schema.fields();
        if columns.len() != fields.len() {
            return Err(WriterError::SchemaMismatch(format!(
                "batch has {} columns, header has {}",
                columns.len(),
                fields.len()
            )));
        }
        for (field, column) in fields.iter().zip(columns) {
            if column.data_type() != field.data_type() {
                return Err(WriterError::SchemaMismatch(format!(
                    "column '{}' has type {}, expected {}",
                    field.name(),
                    column.data_type(),
                    field.data_type()
                )));
            }
            if column.len() != rows {
                return Err(WriterError::SchemaMismatch(format!(
                    "column '{}' has {} rows, expected {}",
                    field.name(),
                    column.len(),
                    rows
                )));
            }
        }
        Ok(())
    }

    fn write_chunk(
        &mut self,
        chunk: &[ArrayRef],
        batch: usize,
        offset: usize,
        len: usize,
    ) -> Result<(), WriterError> {
        let formatted = format_chunk(
            self.schema.fields(),
            &self.kinds,
            &self.options,
            &self.pool,
            chunk,
        );
        self.stats.peak_scratch_bytes = self.pool.peak();
        let formatted = formatted?;
        let charged: usize = formatted.iter().map(FormattedColumn::heap_bytes).sum();
        debug!(
            "Formatted batch {} rows {}..{} ({} scratch bytes)",
            batch,
            offset,
            offset + len,
            charged
        );

        let written = self.write_rows(&formatted, batch, offset, len);
        drop(formatted);
        self.pool.release(charged);
        written
    }

    fn write_rows(
        &mut self,
        formatted: &[FormattedColumn],
        batch: usize,
        offset: usize,
        len: usize,
    ) -> Result<(), WriterError> {
        for row in 0..len {
            let record = self.assembler.assemble(formatted, row);
            self.sink
                .write_all(record)
                .map_err(|source| WriterError::SinkWriteFailure {
                    batch,
                    row: Some(offset + row),
                    source,
                })?;
            self.stats.bytes_written += record.len() as u64;
            self.stats.rows_written += 1;
        }
        Ok(())
    }
}

/// Return the charge of already formatted columns after a failed chunk
fn release_columns(pool: &ScratchPool, columns: &[FormattedColumn]) {
    pool.release(columns.iter().map(FormattedColumn::heap_bytes).sum());
}

/// Format every column of a chunk; the results stay charged to `pool`
#[cfg(not(feature = "parallel"))]
fn format_chunk(
    fields: &Fields,
    kinds: &[ColumnKind],
    options: &WriteOptions,
    pool: &ScratchPool,
    chunk: &[ArrayRef],
) -> Result<Vec<FormattedColumn>, WriterError> {
    let mut formatted = Vec::with_capacity(chunk.len());
    for ((field, kind), array) in fields.iter().zip(kinds).zip(chunk) {
        match format_column(field.name(), array, *kind, options, pool) {
            Ok(column) => formatted.push(column),
            Err(err) => {
                release_columns(pool, &formatted);
                return Err(err);
            }
        }
    }
    Ok(formatted)
}

/// Format the columns of a chunk concurrently; results keep column order.
///
/// All columns charge the same pool as they grow, so the limit holds across
/// the whole chunk.
#[cfg(feature = "parallel")]
fn format_chunk(
    fields: &Fields,
    kinds: &[ColumnKind],
    options: &WriteOptions,
    pool: &ScratchPool,
    chunk: &[ArrayRef],
) -> Result<Vec<FormattedColumn>, WriterError> {
    use rayon::prelude::*;

    let results: Vec<Result<FormattedColumn, WriterError>> = (0..chunk.len())
        .into_par_iter()
        .map(|i| format_column(fields[i].name(), &chunk[i], kinds[i], options, pool))
        .collect();

    let mut formatted = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(column) => formatted.push(column),
            Err(err) if first_error.is_none() => first_error = Some(err),
            Err(_) => {}
        }
    }
    match first_error {
        Some(err) => {
            release_columns(pool, &formatted);
            Err(err)
        }
        None => Ok(formatted),
    }
}

/// Write a whole table as CSV to `sink`
pub fn write_csv_table<W: Write>(
    table: &Table,
    options: &WriteOptions,
    sink: W,
) -> Result<WriterStats, WriterError> {
    let mut writer = CsvWriter::new(sink, Arc::clone(table.schema()), options.clone())?;
    writer.write_batches(table.batches())?;
    writer.finish()
}

/// Write a single record batch as CSV to `sink`
pub fn write_csv_batch<W: Write>(
    batch: &RecordBatch,
    options: &WriteOptions,
    sink: W,
) -> Result<WriterStats, WriterError> {
    let mut writer = CsvWriter::new(sink, batch.schema(), options.clone())?;
    writer.write_batch(batch)?;
    writer.finish()
}
