use std::fmt;

/// Separates the search text from the symbol name.
pub const NAME_DELIMITER: u8 = 0x7f;
/// Separates the symbol name from the `line,offset` pair.
pub const POSITION_DELIMITER: u8 = 0x01;
/// Starts every file section.
pub const SECTION_DELIMITER: u8 = 0x0c;

/// One definition as it appears in a TAGS file section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub name: String,
    pub search_text: String,
    pub line: u32,
    pub offset: u32,
}

impl TagRecord {
    pub fn new(name: impl Into<String>, search_text: impl Into<String>, line: u32, offset: u32) -> Self {
        Self {
            name: name.into(),
            search_text: search_text.into(),
            line,
            offset,
        }
    }

    /// Upper bound of the serialized size, used to grow the buffer before writing.
    pub fn serialized_len(&self) -> usize {
        // two delimiters, comma, newline and two u32s of at most 10 digits
        self.search_text.len() + self.name.len() + 4 + 20
    }
}

impl fmt::Display for TagRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{},{}",
            self.search_text,
            NAME_DELIMITER as char,
            self.name,
            POSITION_DELIMITER as char,
            self.line,
            self.offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_etags_delimiters() {
        let record = TagRecord::new("add", "int add(int a, int b)", 1, 4);
        assert_eq!(record.to_string(), "int add(int a, int b)\x7fadd\x011,4");
    }

    #[test]
    fn test_serialized_len_is_upper_bound() {
        let record = TagRecord::new("x", "int x;", u32::MAX, u32::MAX);
        assert!(record.to_string().len() + 1 <= record.serialized_len());
    }
}
