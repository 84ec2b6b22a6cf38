use crate::indexer::cursor::{Cursor, TranslationUnit};
use crate::tags::search_text;
use crate::tags::TagRecord;

/// Yields one tag record per definition that belongs to the unit's own file.
///
/// Every cursor of the traversal is considered, so definitions nested inside
/// other definitions are reported too. Cursors located in other files (headers
/// pulled in by the parse) and unnamed definitions are skipped.
pub fn definitions<'u>(
    unit: &'u dyn TranslationUnit,
    contents: &'u [u8],
) -> impl Iterator<Item = TagRecord> + 'u {
    let file = unit.file();
    unit.cursors()
        .filter(move |cursor| {
            cursor.is_definition
                && *cursor.location.file == *file
                && !cursor.spelling.is_empty()
        })
        .map(move |cursor| tag_record(cursor, contents))
}

pub fn tag_record(cursor: Cursor, contents: &[u8]) -> TagRecord {
    let offset = cursor.location.offset;
    let span = cursor.extent_end.saturating_sub(offset);

    TagRecord {
        search_text: search_text::extract(contents, offset as usize, span as usize),
        name: cursor.spelling,
        line: cursor.location.line,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::cursor::{CursorKind, Diagnostic, SourceLocation};
    use std::path::Path;
    use std::sync::Arc;

    struct FakeUnit {
        file: Arc<Path>,
        cursors: Vec<Cursor>,
    }

    impl TranslationUnit for FakeUnit {
        fn file(&self) -> &Path {
            &self.file
        }

        fn cursors(&self) -> Box<dyn Iterator<Item = Cursor> + '_> {
            Box::new(self.cursors.iter().cloned())
        }

        fn diagnostics(&self) -> &[Diagnostic] {
            &[]
        }
    }

    fn cursor(file: &str, name: &str, definition: bool, line: u32, offset: u32, end: u32) -> Cursor {
        Cursor {
            kind: CursorKind::FunctionDecl,
            is_definition: definition,
            spelling: name.to_string(),
            display_name: name.to_string(),
            location: SourceLocation {
                file: Arc::from(Path::new(file)),
                line,
                column: 1,
                offset,
            },
            extent_end: end,
        }
    }

    const SOURCE: &[u8] = b"int add(int a, int b) {\n  return a+b;\n}\nint sub(int a, int b);\n";

    #[test]
    fn test_definition_becomes_record() {
        let unit = FakeUnit {
            file: Arc::from(Path::new("foo.c")),
            cursors: vec![cursor("foo.c", "add", true, 1, 4, 39)],
        };

        let records: Vec<TagRecord> = definitions(&unit, SOURCE).collect();
        assert_eq!(records, vec![TagRecord::new("add", "int add(int a, int b)", 1, 4)]);
        assert_eq!(
            records[0].to_string(),
            "int add(int a, int b)\x7fadd\x011,4"
        );
    }

    #[test]
    fn test_declarations_and_foreign_files_are_skipped() {
        let unit = FakeUnit {
            file: Arc::from(Path::new("foo.c")),
            cursors: vec![
                cursor("foo.c", "", false, 1, 0, 64),
                cursor("foo.c", "add", true, 1, 4, 39),
                cursor("foo.h", "helper", true, 3, 10, 40),
                cursor("foo.c", "sub", false, 4, 44, 63),
                cursor("foo.c", "", true, 2, 26, 38),
            ],
        };

        let names: Vec<String> = definitions(&unit, SOURCE).map(|r| r.name).collect();
        assert_eq!(names, vec!["add"]);
    }

    #[test]
    fn test_inverted_extent_does_not_panic() {
        let record = tag_record(cursor("foo.c", "sub", true, 4, 44, 10), SOURCE);
        assert_eq!(record.search_text, "int");
        assert_eq!(record.offset, 44);
    }
}
