use crate::format::quote::write_quoted;
use crate::format::FormattedColumn;

use super::config::LINE_TERMINATOR;

/// Joins serialized cells into complete records.
///
/// The row buffer is reused across rows; each call returns exactly one
/// record ending in a single line terminator. It holds at most one record
/// at a time and is not charged to the scratch pool.
#[derive(Debug)]
pub struct RowAssembler {
    delimiter: u8,
    row: Vec<u8>,
}

impl RowAssembler {
    /// Create an assembler for the given delimiter
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            row: Vec::new(),
        }
    }

    /// Assemble record `row` from one formatted column per field
    pub fn assemble(&mut self, columns: &[FormattedColumn], row: usize) -> &[u8] {
        self.row.clear();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.row.push(self.delimiter);
            }
            self.row.extend_from_slice(column.cell(row));
        }
        self.row.push(LINE_TERMINATOR);
        &self.row
    }

    /// Assemble the header record; names are always quoted
    pub fn assemble_header<'a, I>(&mut self, names: I) -> &[u8]
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.row.clear();
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                self.row.push(self.delimiter);
            }
            write_quoted(&mut self.row, name.as_bytes());
        }
        self.row.push(LINE_TERMINATOR);
        &self.row
    }
}
