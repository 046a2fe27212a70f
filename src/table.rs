//! # Tables
//!
//! A [`Table`] is a schema plus an ordered list of record batches that all
//! share it. The writer only ever borrows a table.

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::writer::WriterError;

/// An ordered sequence of record batches with a common schema
#[derive(Debug, Clone)]
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Table {
    /// Create a table, checking that every batch matches `schema`.
    ///
    /// Batches must have the schema's column count and, column by column,
    /// its data types. Field names and metadata of the batches are not
    /// compared; the table schema supplies the header.
    pub fn try_new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self, WriterError> {
        for (index, batch) in batches.iter().enumerate() {
            if batch.num_columns() != schema.fields().len() {
                return Err(WriterError::SchemaMismatch(format!(
                    "batch {index} has {} columns, table schema has {}",
                    batch.num_columns(),
                    schema.fields().len()
                )));
            }
            for (field, column) in schema.fields().iter().zip(batch.columns()) {
                if field.data_type() != column.data_type() {
                    return Err(WriterError::SchemaMismatch(format!(
                        "batch {index} column '{}' has type {}, expected {}",
                        field.name(),
                        column.data_type(),
                        field.data_type()
                    )));
                }
            }
        }
        Ok(Self { schema, batches })
    }

    /// Create a table whose schema is taken from the first batch
    pub fn from_batches(batches: Vec<RecordBatch>) -> Result<Self, WriterError> {
        let schema = batches
            .first()
            .map(|b| b.schema())
            .ok_or_else(|| {
                WriterError::SchemaMismatch("cannot infer a table schema from zero batches".into())
            })?;
        Self::try_new(schema, batches)
    }

    /// Table schema
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Batches in source order
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// Number of batches
    pub fn num_batches(&self) -> usize {
        self.batches.len()
    }

    /// Total number of rows across all batches
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.fields().iter().map(|f| f.name().as_str()).collect()
    }
}
