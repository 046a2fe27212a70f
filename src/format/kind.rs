use std::fmt;

use arrow::datatypes::DataType;

use crate::writer::WriterError;

/// How the quoting engine treats the cells of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    /// Numeric, boolean and temporal values: quoted only when the text
    /// contains the delimiter, a quote or a line break
    Plain,
    /// String and binary values: always quoted when non-null
    Quoted,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCategory::Plain => write!(f, "plain"),
            TypeCategory::Quoted => write!(f, "quoted"),
        }
    }
}

/// The closed set of column types the writer can format.
///
/// Every Arrow type is either mapped onto one of these variants by
/// [`ColumnKind::of`] or rejected with [`WriterError::UnsupportedType`].
/// Formatting code matches on this enum exhaustively, so adding a variant
/// forces every formatting path to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `DataType::Null`: every slot is null
    Null,
    /// `true` / `false`
    Boolean,
    /// Signed and unsigned integers of any width
    Integer,
    /// Half, single and double precision floats
    Float,
    /// Decimal128 / Decimal256
    Decimal,
    /// Dates, times, timestamps, durations and intervals
    Temporal,
    /// UTF-8 strings (regular, large and view layouts)
    Utf8,
    /// Variable and fixed size binary (regular, large and view layouts)
    Binary,
}

impl ColumnKind {
    /// Classify an Arrow data type.
    ///
    /// Dictionary columns take the kind of their value type. Nested types
    /// have no CSV representation and are rejected.
    pub fn of(column: &str, data_type: &DataType) -> Result<Self, WriterError> {
        let kind = match data_type {
            DataType::Null => ColumnKind::Null,
            DataType::Boolean => ColumnKind::Boolean,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => ColumnKind::Float,
            DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => ColumnKind::Decimal,
            DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Timestamp(_, _)
            | DataType::Duration(_)
            | DataType::Interval(_) => ColumnKind::Temporal,
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ColumnKind::Utf8,
            DataType::Binary
            | DataType::LargeBinary
            | DataType::FixedSizeBinary(_)
            | DataType::BinaryView => ColumnKind::Binary,
            DataType::Dictionary(_, value_type) => Self::of(column, value_type)?,
            // Lists, structs, unions, maps and run-end encoded arrays
            _ => {
                return Err(WriterError::UnsupportedType {
                    column: column.to_string(),
                    data_type: data_type.clone(),
                })
            }
        };
        Ok(kind)
    }

    /// Quoting category of this kind
    pub fn category(&self) -> TypeCategory {
        match self {
            ColumnKind::Null
            | ColumnKind::Boolean
            | ColumnKind::Integer
            | ColumnKind::Float
            | ColumnKind::Decimal
            | ColumnKind::Temporal => TypeCategory::Plain,
            ColumnKind::Utf8 | ColumnKind::Binary => TypeCategory::Quoted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Fields, IntervalUnit, TimeUnit};
    use std::sync::Arc;

    #[test]
    fn test_primitive_kinds() {
        assert_eq!(ColumnKind::of("c", &DataType::Int64).unwrap(), ColumnKind::Integer);
        assert_eq!(ColumnKind::of("c", &DataType::UInt8).unwrap(), ColumnKind::Integer);
        assert_eq!(ColumnKind::of("c", &DataType::Float32).unwrap(), ColumnKind::Float);
        assert_eq!(ColumnKind::of("c", &DataType::Boolean).unwrap(), ColumnKind::Boolean);
        assert_eq!(
            ColumnKind::of("c", &DataType::Decimal128(10, 2)).unwrap(),
            ColumnKind::Decimal
        );
        assert_eq!(
            ColumnKind::of("c", &DataType::Timestamp(TimeUnit::Millisecond, None)).unwrap(),
            ColumnKind::Temporal
        );
        assert_eq!(
            ColumnKind::of("c", &DataType::Interval(IntervalUnit::DayTime)).unwrap(),
            ColumnKind::Temporal
        );
    }

    #[test]
    fn test_text_kinds_are_quoted() {
        for dt in [
            DataType::Utf8,
            DataType::LargeUtf8,
            DataType::Binary,
            DataType::FixedSizeBinary(4),
        ] {
            let kind = ColumnKind::of("c", &dt).unwrap();
            assert_eq!(kind.category(), TypeCategory::Quoted, "{dt}");
        }
        assert_eq!(ColumnKind::Integer.category(), TypeCategory::Plain);
        assert_eq!(ColumnKind::Null.category(), TypeCategory::Plain);
    }

    #[test]
    fn test_dictionary_uses_value_kind() {
        let dt = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        assert_eq!(ColumnKind::of("c", &dt).unwrap(), ColumnKind::Utf8);
    }

    #[test]
    fn test_nested_types_rejected() {
        let item = Arc::new(Field::new("item", DataType::Int32, true));
        let nested = [
            DataType::List(item.clone()),
            DataType::LargeList(item.clone()),
            DataType::FixedSizeList(item, 2),
            DataType::Struct(Fields::from(vec![Field::new("a", DataType::Int32, true)])),
        ];
        for dt in nested {
            match ColumnKind::of("nested_col", &dt) {
                Err(WriterError::UnsupportedType { column, data_type }) => {
                    assert_eq!(column, "nested_col");
                    assert_eq!(data_type, dt);
                }
                other => panic!("expected UnsupportedType for {dt}, got {other:?}"),
            }
        }
    }
}
