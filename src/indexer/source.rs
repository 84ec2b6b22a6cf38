use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::error::Result;

/// Read-only contents of one source file, mapped for the duration of its visit.
pub enum SourceContents {
    Mapped(Mmap),
    /// Zero-length files cannot be mapped.
    Empty,
}

impl SourceContents {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(SourceContents::Empty);
        }
        // SAFETY: the map is read-only and dropped once this file's section is
        // written; the file must not be truncated by another process meanwhile.
        let map = unsafe { Mmap::map(&file)? };
        Ok(SourceContents::Mapped(map))
    }
}

impl Deref for SourceContents {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            SourceContents::Mapped(map) => map,
            SourceContents::Empty => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_maps_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.c");
        fs::write(&path, "int a;\n").unwrap();

        let contents = SourceContents::open(&path).unwrap();
        assert_eq!(&*contents, b"int a;\n");
    }

    #[test]
    fn test_open_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.h");
        fs::write(&path, "").unwrap();

        let contents = SourceContents::open(&path).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(SourceContents::open(&dir.path().join("gone.c")).is_err());
    }
}
