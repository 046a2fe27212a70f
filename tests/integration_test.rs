//! Integration tests for colcsv
//!
//! These tests drive the public API end to end and re-parse the output with
//! an independent CSV reader.

use arrow::array::{
    ArrayRef, BinaryArray, BooleanArray, Date32Array, Decimal128Array, Float64Array, Int32Array,
    Int64Array, StringArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use colcsv::prelude::*;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::{self, File};
use std::sync::Arc;
use tempfile::tempdir;

fn write_to_string(batch: &RecordBatch, options: &WriteOptions) -> String {
    let mut out = Vec::new();
    write_csv_batch(batch, options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn single_column(name: &str, array: ArrayRef) -> RecordBatch {
    RecordBatch::try_from_iter(vec![(name, array)]).unwrap()
}

/// Two-column batch with a null string value
#[test]
fn test_int_and_string_with_header() {
    let batch = RecordBatch::try_from_iter(vec![
        ("col1", Arc::new(Int32Array::from(vec![1, 2])) as ArrayRef),
        (
            "col2",
            Arc::new(StringArray::from(vec![Some("a"), None])) as ArrayRef,
        ),
    ])
    .unwrap();

    let csv = write_to_string(&batch, &WriteOptions::default());
    assert_eq!(csv, "\"col1\",\"col2\"\n1,\"a\"\n2,\n");
}

/// Embedded quotes are doubled inside a quoted cell
#[test]
fn test_embedded_quotes() {
    let batch = single_column(
        "s",
        Arc::new(StringArray::from(vec!["he said \"hi\""])) as ArrayRef,
    );
    let options = WriteOptions::new().with_header(false);
    assert_eq!(write_to_string(&batch, &options), "\"he said \"\"hi\"\"\"\n");
}

/// Plain integers are not quoted
#[test]
fn test_plain_integer() {
    let batch = single_column("n", Arc::new(Int64Array::from(vec![42])) as ArrayRef);
    let options = WriteOptions::new().with_header(false);
    assert_eq!(write_to_string(&batch, &options), "42\n");
}

/// Mismatched column lengths fail before any row of the batch is written
#[test]
fn test_column_length_mismatch() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("A", DataType::Int32, false),
        Field::new("B", DataType::Int32, false),
    ]));
    let options = WriteOptions::new().with_header(false);
    let mut writer = CsvWriter::new(Vec::new(), schema, options).unwrap();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![1, 2, 3])),
        Arc::new(Int32Array::from(vec![1, 2])),
    ];
    let err = writer.write_columns(&columns).unwrap_err();
    assert!(matches!(err, WriterError::SchemaMismatch(_)), "{err}");
    assert_eq!(writer.stats().bytes_written, 0);
    assert_eq!(writer.state(), WriterState::Failed);
}

#[test]
fn test_plain_types_unquoted() {
    let batch = RecordBatch::try_from_iter(vec![
        (
            "flag",
            Arc::new(BooleanArray::from(vec![true, false])) as ArrayRef,
        ),
        (
            "ratio",
            Arc::new(Float64Array::from(vec![0.5, -2.25])) as ArrayRef,
        ),
        (
            "day",
            Arc::new(Date32Array::from(vec![0, 365])) as ArrayRef,
        ),
        (
            "price",
            Arc::new(
                Decimal128Array::from(vec![12345, -5])
                    .with_precision_and_scale(10, 2)
                    .unwrap(),
            ) as ArrayRef,
        ),
    ])
    .unwrap();

    let csv = write_to_string(&batch, &WriteOptions::new().with_header(false));
    assert_eq!(csv, "true,0.5,1970-01-01,123.45\nfalse,-2.25,1971-01-01,-0.05\n");
}

#[test]
fn test_timestamp_unquoted() {
    let batch = single_column(
        "ts",
        Arc::new(TimestampSecondArray::from(vec![Some(0), None])) as ArrayRef,
    );
    let csv = write_to_string(&batch, &WriteOptions::new().with_header(false));
    assert_eq!(csv, "1970-01-01T00:00:00\n\n");
}

#[test]
fn test_plain_value_containing_delimiter_is_quoted() {
    // With '.' as delimiter, the decimal point forces quoting
    let batch = single_column("x", Arc::new(Float64Array::from(vec![1.5])) as ArrayRef);
    let options = WriteOptions::new().with_header(false).with_delimiter(b'.');
    assert_eq!(write_to_string(&batch, &options), "\"1.5\"\n");
}

#[test]
fn test_binary_written_byte_for_byte() {
    let payloads: Vec<Option<&[u8]>> =
        vec![Some(&[0xde, 0xad, b'"', 0xbe][..]), None, Some(&b""[..])];
    let batch = single_column("bin", Arc::new(BinaryArray::from(payloads)) as ArrayRef);

    let mut out = Vec::new();
    write_csv_batch(&batch, &WriteOptions::default(), &mut out).unwrap();
    let mut expected = b"\"bin\"\n\"".to_vec();
    expected.extend_from_slice(&[0xde, 0xad, b'"', b'"', 0xbe]);
    expected.extend_from_slice(b"\"\n\n\"\"\n");
    assert_eq!(out, expected);

    let mut reader = csv::ReaderBuilder::new().from_reader(out.as_slice());
    let records: Vec<csv::ByteRecord> = reader.byte_records().map(|r| r.unwrap()).collect();
    assert_eq!(&records[0][0], &[0xde, 0xad, b'"', 0xbe]);
}

#[test]
fn test_multiline_strings_reparse() {
    let batch = RecordBatch::try_from_iter(vec![
        ("id", Arc::new(Int32Array::from(vec![1, 2])) as ArrayRef),
        (
            "note",
            Arc::new(StringArray::from(vec!["line one\nline two", "a,b"])) as ArrayRef,
        ),
    ])
    .unwrap();

    let csv_text = write_to_string(&batch, &WriteOptions::default());
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    assert_eq!(reader.headers().unwrap(), vec!["id", "note"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "line one\nline two");
    assert_eq!(&rows[1][1], "a,b");
}

/// Write a Parquet file, read it back in batches, and export it as CSV
#[test]
fn test_parquet_to_csv_file() {
    let dir = tempdir().unwrap();
    let parquet_path = dir.path().join("input.parquet");
    let csv_path = dir.path().join("output.csv");

    let ids: Vec<i64> = (0..250).collect();
    let names: Vec<Option<String>> = (0..250)
        .map(|i| if i % 10 == 0 { None } else { Some(format!("row \"{i}\"")) })
        .collect();
    let source = RecordBatch::try_from_iter(vec![
        ("id", Arc::new(Int64Array::from(ids)) as ArrayRef),
        ("name", Arc::new(StringArray::from(names)) as ArrayRef),
    ])
    .unwrap();

    let file = File::create(&parquet_path).unwrap();
    let mut parquet_writer = ArrowWriter::try_new(file, source.schema(), None).unwrap();
    parquet_writer.write(&source).unwrap();
    parquet_writer.close().unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&parquet_path).unwrap())
        .unwrap()
        .with_batch_size(64)
        .build()
        .unwrap();
    let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
    assert!(batches.len() > 1);
    let table = Table::from_batches(batches).unwrap();
    assert_eq!(table.num_rows(), 250);

    let options = WriteOptions::new().with_batch_size(100).with_null_string("NA");
    let mut writer = CsvWriter::new_file(&csv_path, Arc::clone(table.schema()), options).unwrap();
    writer.write_batches(table.batches()).unwrap();
    let stats = writer.finish().unwrap();
    assert_eq!(stats.rows_written, 250);
    assert_eq!(stats.batches_written, table.num_batches());

    let content = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content.lines().count(), 251);
    assert_eq!(stats.bytes_written, content.len() as u64);
    assert!(content.starts_with("\"id\",\"name\"\n0,NA\n1,\"row \"\"1\"\"\"\n"));
    assert!(content.ends_with("249,\"row \"\"249\"\"\"\n"));

    let mut csv_reader = csv::Reader::from_path(&csv_path).unwrap();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record.unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record[0].parse::<usize>().unwrap(), i);
    }
}

#[test]
fn test_unsupported_type_reported() {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "tags",
        DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
        true,
    )]));
    let err = CsvWriter::new(Vec::new(), schema, WriteOptions::default())
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("Unsupported type for column 'tags'"));
}
