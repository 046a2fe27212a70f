//! Quoting and escaping of individual cells.
//!
//! Quoted-category cells are always wrapped in quotes. Plain-category cells
//! are wrapped only when their text would otherwise break the record
//! structure. In both cases a quote inside the payload is doubled.

use super::kind::TypeCategory;

/// The quote character
pub const QUOTE: u8 = b'"';

/// Whether plain text must be quoted to survive as a single field
#[inline]
pub fn needs_quoting(text: &[u8], delimiter: u8) -> bool {
    text.iter()
        .any(|&b| b == delimiter || b == QUOTE || b == b'\n' || b == b'\r')
}

/// Number of bytes `payload` occupies once quoted
#[inline]
pub fn quoted_len(payload: &[u8]) -> usize {
    let quotes = payload.iter().filter(|&&b| b == QUOTE).count();
    payload.len() + quotes + 2
}

/// Number of bytes [`write_cell`] appends for `payload`
pub fn encoded_len(payload: &[u8], category: TypeCategory, delimiter: u8) -> usize {
    match category {
        TypeCategory::Quoted => quoted_len(payload),
        TypeCategory::Plain if needs_quoting(payload, delimiter) => quoted_len(payload),
        TypeCategory::Plain => payload.len(),
    }
}

/// Append `payload` wrapped in quotes, doubling embedded quotes
pub fn write_quoted(out: &mut Vec<u8>, payload: &[u8]) {
    out.push(QUOTE);
    for (i, part) in payload.split(|&b| b == QUOTE).enumerate() {
        if i > 0 {
            out.push(QUOTE);
            out.push(QUOTE);
        }
        out.extend_from_slice(part);
    }
    out.push(QUOTE);
}

/// Append the serialized form of a non-null cell
pub fn write_cell(out: &mut Vec<u8>, payload: &[u8], category: TypeCategory, delimiter: u8) {
    match category {
        TypeCategory::Quoted => write_quoted(out, payload),
        TypeCategory::Plain if needs_quoting(payload, delimiter) => write_quoted(out, payload),
        TypeCategory::Plain => out.extend_from_slice(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(payload: &[u8], category: TypeCategory) -> Vec<u8> {
        let mut out = Vec::new();
        write_cell(&mut out, payload, category, b',');
        assert_eq!(out.len(), encoded_len(payload, category, b','));
        out
    }

    #[test]
    fn test_plain_left_alone() {
        assert_eq!(cell(b"42", TypeCategory::Plain), b"42");
        assert_eq!(cell(b"-1.5e10", TypeCategory::Plain), b"-1.5e10");
        assert_eq!(cell(b"", TypeCategory::Plain), b"");
    }

    #[test]
    fn test_plain_upgraded_when_special() {
        assert_eq!(cell(b"1,5", TypeCategory::Plain), b"\"1,5\"");
        assert_eq!(cell(b"a\nb", TypeCategory::Plain), b"\"a\nb\"");
        assert_eq!(cell(b"x\"y", TypeCategory::Plain), b"\"x\"\"y\"");
    }

    #[test]
    fn test_quoted_always_wrapped() {
        assert_eq!(cell(b"a", TypeCategory::Quoted), b"\"a\"");
        assert_eq!(cell(b"", TypeCategory::Quoted), b"\"\"");
        assert_eq!(
            cell(b"he said \"hi\"", TypeCategory::Quoted),
            b"\"he said \"\"hi\"\"\""
        );
        assert_eq!(cell(b"\"\"", TypeCategory::Quoted), b"\"\"\"\"\"\"");
    }

    #[test]
    fn test_custom_delimiter() {
        assert!(!needs_quoting(b"1,5", b';'));
        assert!(needs_quoting(b"1;5", b';'));
        assert!(needs_quoting(b"a\rb", b';'));
    }

    #[test]
    fn test_line_breaks_preserved_inside_quotes() {
        assert_eq!(cell(b"l1\r\nl2", TypeCategory::Quoted), b"\"l1\r\nl2\"");
    }
}
