use std::mem::size_of;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BinaryViewArray, FixedSizeBinaryArray, LargeBinaryArray,
    LargeStringArray, StringArray, StringViewArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::writer::{WriteOptions, WriterError};

use super::kind::{ColumnKind, TypeCategory};
use super::quote::{encoded_len, write_cell};
use super::scratch::{ScratchCharge, ScratchPool};

/// Display options for plain-category values. Errors are surfaced rather
/// than rendered into the cell text.
const PLAIN_FORMAT: FormatOptions<'static> = FormatOptions::new().with_display_error(false);

/// The serialized cells of one column of one chunk.
///
/// Cells are stored back to back in a single buffer, already quoted and
/// escaped, so assembling a row only copies slices.
#[derive(Debug, Clone)]
pub struct FormattedColumn {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl FormattedColumn {
    /// Number of cells
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialized text of the cell at `row`
    #[inline]
    pub fn cell(&self, row: usize) -> &[u8] {
        &self.bytes[self.offsets[row]..self.offsets[row + 1]]
    }

    /// Total serialized size of all cells
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Heap memory held by this column; this is what stays charged to the
    /// pool until the caller releases it
    pub fn heap_bytes(&self) -> usize {
        self.bytes.capacity() + self.offsets.capacity() * size_of::<usize>()
    }
}

/// Growable cell buffer whose capacity is charged to a [`ScratchPool`]
/// before every allocation
struct CellBuffer<'p> {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
    charge: ScratchCharge<'p>,
}

impl<'p> CellBuffer<'p> {
    fn try_new(rows: usize, pool: &'p ScratchPool) -> Result<Self, WriterError> {
        let mut buffer = Self {
            bytes: Vec::new(),
            offsets: Vec::new(),
            charge: ScratchCharge::new(pool),
        };
        let offset_bytes = (rows + 1).saturating_mul(size_of::<usize>());
        buffer.charge.resize(offset_bytes)?;
        buffer
            .offsets
            .try_reserve_exact(rows + 1)
            .map_err(|_| WriterError::AllocationFailure {
                requested: offset_bytes,
                limit: None,
            })?;
        buffer.settle()?;
        buffer.offsets.push(0);
        Ok(buffer)
    }

    fn heap_bytes(&self) -> usize {
        self.bytes.capacity() + self.offsets.capacity() * size_of::<usize>()
    }

    /// Bring the charge in line with the memory actually held
    fn settle(&mut self) -> Result<(), WriterError> {
        let held = self.heap_bytes();
        self.charge.resize(held)
    }

    /// Make room for `additional` more bytes.
    ///
    /// Capacity doubles as usual, but never past what the pool has left; the
    /// new capacity is charged before the allocation happens.
    fn reserve(&mut self, additional: usize) -> Result<(), WriterError> {
        let len = self.bytes.len();
        let capacity = self.bytes.capacity();
        if capacity - len >= additional {
            return Ok(());
        }

        let fixed = self.offsets.capacity() * size_of::<usize>();
        let needed = len.saturating_add(additional);
        let mut target = needed.max(capacity.saturating_mul(2));
        if let Some(remaining) = self.charge.pool().remaining() {
            target = target.min(capacity.saturating_add(remaining)).max(needed);
        }
        if self.charge.resize(fixed + target).is_err() {
            target = needed;
            self.charge.resize(fixed + target)?;
        }

        let grown = self.bytes.try_reserve_exact(target - len);
        self.settle()?;
        grown.map_err(|_| WriterError::AllocationFailure {
            requested: target - capacity,
            limit: None,
        })
    }

    /// Append text that never needs quoting (the null representation)
    fn push_raw(&mut self, text: &[u8]) -> Result<(), WriterError> {
        self.reserve(text.len())?;
        self.bytes.extend_from_slice(text);
        self.offsets.push(self.bytes.len());
        Ok(())
    }

    fn push_cell(
        &mut self,
        payload: &[u8],
        category: TypeCategory,
        delimiter: u8,
    ) -> Result<(), WriterError> {
        self.reserve(encoded_len(payload, category, delimiter))?;
        write_cell(&mut self.bytes, payload, category, delimiter);
        self.offsets.push(self.bytes.len());
        Ok(())
    }

    /// Drop growth slack when memory is capped, then hand the charge over to
    /// the returned column
    fn finish(mut self) -> Result<FormattedColumn, WriterError> {
        if self.charge.pool().limit().is_some() {
            self.bytes.shrink_to_fit();
        }
        self.settle()?;
        self.charge.keep();
        Ok(FormattedColumn {
            bytes: self.bytes,
            offsets: self.offsets,
        })
    }
}

/// Byte access to the string and binary layouts
enum RawBytes<'a> {
    Utf8(&'a StringArray),
    LargeUtf8(&'a LargeStringArray),
    Utf8View(&'a StringViewArray),
    Binary(&'a BinaryArray),
    LargeBinary(&'a LargeBinaryArray),
    FixedSizeBinary(&'a FixedSizeBinaryArray),
    BinaryView(&'a BinaryViewArray),
}

impl<'a> RawBytes<'a> {
    fn try_new(array: &'a dyn Array) -> Option<Self> {
        let any = array.as_any();
        let raw = match array.data_type() {
            DataType::Utf8 => RawBytes::Utf8(any.downcast_ref()?),
            DataType::LargeUtf8 => RawBytes::LargeUtf8(any.downcast_ref()?),
            DataType::Utf8View => RawBytes::Utf8View(any.downcast_ref()?),
            DataType::Binary => RawBytes::Binary(any.downcast_ref()?),
            DataType::LargeBinary => RawBytes::LargeBinary(any.downcast_ref()?),
            DataType::FixedSizeBinary(_) => RawBytes::FixedSizeBinary(any.downcast_ref()?),
            DataType::BinaryView => RawBytes::BinaryView(any.downcast_ref()?),
            _ => return None,
        };
        Some(raw)
    }

    #[inline]
    fn value(&self, row: usize) -> &'a [u8] {
        match self {
            RawBytes::Utf8(a) => a.value(row).as_bytes(),
            RawBytes::LargeUtf8(a) => a.value(row).as_bytes(),
            RawBytes::Utf8View(a) => a.value(row).as_bytes(),
            RawBytes::Binary(a) => a.value(row),
            RawBytes::LargeBinary(a) => a.value(row),
            RawBytes::FixedSizeBinary(a) => a.value(row),
            RawBytes::BinaryView(a) => a.value(row),
        }
    }
}

/// Serialize every cell of `array`.
///
/// `kind` must be the classification of the array's data type (see
/// [`ColumnKind::of`]). Every buffer is charged to `pool` before it grows;
/// going over the pool's limit, or failing to allocate, yields
/// [`WriterError::AllocationFailure`]. On success the returned column's
/// [`heap_bytes`](FormattedColumn::heap_bytes) remain charged and must be
/// released by the caller once the column is no longer needed. On failure
/// nothing stays charged.
pub fn format_column(
    name: &str,
    array: &ArrayRef,
    kind: ColumnKind,
    options: &WriteOptions,
    pool: &ScratchPool,
) -> Result<FormattedColumn, WriterError> {
    // Dictionaries are written as their decoded values
    let values = match array.data_type() {
        DataType::Dictionary(_, value_type) => cast(array, value_type)?,
        _ => Arc::clone(array),
    };

    let rows = values.len();
    let mut out = CellBuffer::try_new(rows, pool)?;
    let nulls = values.logical_nulls();
    let is_null = |row: usize| nulls.as_ref().is_some_and(|n| n.is_null(row));
    let null_text = options.null_string.as_bytes();
    let category = kind.category();
    let delimiter = options.delimiter;

    match kind {
        ColumnKind::Null => {
            for _ in 0..rows {
                out.push_raw(null_text)?;
            }
        }
        ColumnKind::Utf8 | ColumnKind::Binary => {
            let raw = RawBytes::try_new(values.as_ref()).ok_or_else(|| {
                WriterError::UnsupportedType {
                    column: name.to_string(),
                    data_type: values.data_type().clone(),
                }
            })?;
            for row in 0..rows {
                if is_null(row) {
                    out.push_raw(null_text)?;
                } else {
                    out.push_cell(raw.value(row), category, delimiter)?;
                }
            }
        }
        ColumnKind::Boolean
        | ColumnKind::Integer
        | ColumnKind::Float
        | ColumnKind::Decimal
        | ColumnKind::Temporal => {
            let formatter = ArrayFormatter::try_new(values.as_ref(), &PLAIN_FORMAT)?;
            let mut text = String::new();
            let mut text_charge = ScratchCharge::new(pool);
            for row in 0..rows {
                if is_null(row) {
                    out.push_raw(null_text)?;
                } else {
                    text.clear();
                    formatter.value(row).write(&mut text)?;
                    text_charge.resize(text.capacity())?;
                    out.push_cell(text.as_bytes(), category, delimiter)?;
                }
            }
        }
    }

    out.finish()
}
