use crate::format::quote::QUOTE;

use super::error::WriterError;

/// Record terminator. Fixed so output is identical on every platform.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Default number of rows formatted per chunk
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Options for a single CSV write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Field delimiter (default: `,`)
    pub delimiter: u8,

    /// Emit the column names as the first row (default: true)
    pub include_header: bool,

    /// Text written for null values, never quoted (default: empty)
    pub null_string: String,

    /// Maximum number of rows formatted at once.
    /// Larger batches are sliced, bounding scratch memory per chunk.
    pub batch_size: usize,

    /// Byte limit for the formatting buffers of one chunk (None = unbounded)
    pub max_scratch_bytes: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            null_string: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_scratch_bytes: None,
        }
    }
}

impl WriteOptions {
    /// Creates new options with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables the header row
    #[must_use]
    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    /// Sets the null representation
    #[must_use]
    pub fn with_null_string(mut self, null_string: impl Into<String>) -> Self {
        self.null_string = null_string.into();
        self
    }

    /// Sets the number of rows formatted per chunk
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Caps the scratch memory used per chunk
    #[must_use]
    pub fn with_max_scratch_bytes(mut self, limit: usize) -> Self {
        self.max_scratch_bytes = Some(limit);
        self
    }

    /// Check that these options produce well-formed output
    pub fn validate(&self) -> Result<(), WriterError> {
        if self.batch_size == 0 {
            return Err(WriterError::InvalidOptions(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if matches!(self.delimiter, QUOTE | LINE_TERMINATOR | b'\r') {
            return Err(WriterError::InvalidOptions(format!(
                "delimiter {:?} conflicts with quoting or line breaks",
                self.delimiter as char
            )));
        }
        // Nulls are written bare, so they must not need quoting themselves
        if self
            .null_string
            .bytes()
            .any(|b| matches!(b, QUOTE | LINE_TERMINATOR | b'\r') || b == self.delimiter)
        {
            return Err(WriterError::InvalidOptions(format!(
                "null string {:?} contains the delimiter, a quote or a line break",
                self.null_string
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = WriteOptions::default();
        assert_eq!(options.delimiter, b',');
        assert!(options.include_header);
        assert_eq!(options.null_string, "");
        assert_eq!(options.batch_size, DEFAULT_BATCH_SIZE);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = WriteOptions::new()
            .with_delimiter(b'\t')
            .with_header(false)
            .with_null_string("\\N")
            .with_batch_size(10)
            .with_max_scratch_bytes(4096);
        assert_eq!(options.delimiter, b'\t');
        assert!(!options.include_header);
        assert_eq!(options.null_string, "\\N");
        assert_eq!(options.batch_size, 10);
        assert_eq!(options.max_scratch_bytes, Some(4096));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_options() {
        assert!(WriteOptions::new().with_batch_size(0).validate().is_err());
        assert!(WriteOptions::new().with_delimiter(b'"').validate().is_err());
        assert!(WriteOptions::new().with_delimiter(b'\n').validate().is_err());
        assert!(WriteOptions::new().with_null_string("a,b").validate().is_err());
        assert!(WriteOptions::new()
            .with_delimiter(b';')
            .with_null_string("a,b")
            .validate()
            .is_ok());
    }
}
