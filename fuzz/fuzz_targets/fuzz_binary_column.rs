#![no_main]

use std::sync::Arc;

use arrow::array::{ArrayRef, BinaryArray};
use arrow::record_batch::RecordBatch;
use colcsv::writer::{write_csv_batch, WriteOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Split the input on NUL into cells of a single binary column
    let cells: Vec<&[u8]> = data.split(|&b| b == 0).collect();
    let rows = cells.len();
    let array: ArrayRef = Arc::new(BinaryArray::from(cells));
    let batch = match RecordBatch::try_from_iter(vec![("payload", array)]) {
        Ok(batch) => batch,
        Err(_) => return,
    };

    let options = WriteOptions::new().with_header(false).with_batch_size(7);
    let mut out = Vec::new();
    let stats = write_csv_batch(&batch, &options, &mut out).expect("binary columns always write");
    assert_eq!(stats.rows_written, rows);
    assert_eq!(stats.bytes_written as usize, out.len());
    assert_eq!(out.last(), Some(&b'\n'));
});
