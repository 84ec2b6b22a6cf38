//! Recovers the declaration snippet that editors use to locate a tag.
//!
//! This is a byte-level heuristic rather than a parser: the snippet runs from the
//! start of the line holding the definition's name up to the first terminator
//! after the name, which approximates the declarator line without reparsing.

fn is_terminator(byte: u8) -> bool {
    matches!(byte, b')' | b'{' | b'\n' | b'\r' | b';')
}

/// Extracts the search text for a definition whose name starts at `offset`.
///
/// The forward scan never passes `offset + max_span` or the end of `contents`.
/// A terminator found in range is kept; when none is found the bound acts as the
/// terminator. Trailing whitespace is trimmed, but never past the line start.
pub fn extract(contents: &[u8], offset: usize, max_span: usize) -> String {
    let offset = offset.min(contents.len());

    let start = contents[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0);

    let stop = offset.saturating_add(max_span).min(contents.len());
    let mut end = match contents[offset..stop].iter().position(|&b| is_terminator(b)) {
        Some(pos) => offset + pos + 1,
        None => stop,
    };

    while end > start && contents[end - 1].is_ascii_whitespace() {
        end -= 1;
    }

    String::from_utf8_lossy(&contents[start..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADD: &[u8] = b"int add(int a, int b) {\n  return a+b;\n}\n";

    #[test]
    fn test_function_signature_stops_at_paren() {
        assert_eq!(extract(ADD, 4, ADD.len() - 4), "int add(int a, int b)");
    }

    #[test]
    fn test_offset_at_line_start() {
        assert_eq!(extract(ADD, 0, ADD.len()), "int add(int a, int b)");
    }

    #[test]
    fn test_struct_keeps_open_brace() {
        let src = b"/* c */\nstruct point {\n  int x;\n};\n";
        assert_eq!(extract(src, 15, 20), "struct point {");
    }

    #[test]
    fn test_newline_terminator_is_trimmed() {
        let src = b"#define MAX 10   \nint y;\n";
        assert_eq!(extract(src, 8, 10), "#define MAX 10");
    }

    #[test]
    fn test_crlf_line_is_trimmed() {
        let src = b"#define MAX 10\r\n";
        assert_eq!(extract(src, 8, 8), "#define MAX 10");
    }

    #[test]
    fn test_leading_indentation_is_part_of_line() {
        let src = b"struct s {\n    int field;\n};\n";
        assert_eq!(extract(src, 19, 6), "    int field;");
    }

    #[test]
    fn test_bound_acts_as_terminator() {
        let src = b"enum color { RED, GREEN };\n";
        assert_eq!(extract(src, 13, 3), "enum color { RED");
    }

    #[test]
    fn test_zero_span_returns_line_prefix() {
        let src = b"  int value = 3;\n";
        assert_eq!(extract(src, 6, 0), "  int");
    }

    #[test]
    fn test_whitespace_only_prefix_is_trimmed_to_line_start() {
        let src = b"a;\n    \n";
        assert_eq!(extract(src, 7, 0), "");
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let src = b"int tail";
        assert_eq!(extract(src, 100, 10), "int tail");
    }

    #[test]
    fn test_end_of_file_without_terminator() {
        let src = b"int last";
        assert_eq!(extract(src, 4, 100), "int last");
    }

    #[test]
    fn test_empty_contents() {
        assert_eq!(extract(b"", 0, 10), "");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract(ADD, 4, 30);
        let second = extract(ADD, 4, 30);
        assert_eq!(first, second);
    }
}
