use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

#[cfg(not(unix))]
use tracing::warn;

use crate::error::Result;
use crate::tags::buffer::TagBuffer;
use crate::tags::record::SECTION_DELIMITER;

/// Writes file sections to a TAGS stream in visit order.
pub struct TagsWriter<W: Write> {
    out: W,
    sections: usize,
    bytes_written: u64,
}

impl<W: Write> TagsWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sections: 0,
            bytes_written: 0,
        }
    }

    /// Writes the buffered records of `file` as one section and resets the buffer.
    pub fn emit_section(&mut self, file: &Path, buffer: &mut TagBuffer) -> Result<()> {
        let snapshot = buffer.snapshot_and_reset();
        let path = path_bytes(file);
        let length = format!(",{}\n", snapshot.len());

        self.out.write_all(&[SECTION_DELIMITER, b'\n'])?;
        self.out.write_all(&path)?;
        self.out.write_all(length.as_bytes())?;
        self.out.write_all(&snapshot)?;

        self.sections += 1;
        self.bytes_written += (2 + path.len() + length.len() + snapshot.len()) as u64;
        Ok(())
    }

    pub fn sections(&self) -> usize {
        self.sections
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// The path exactly as the filesystem names it.
#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_str() {
        Some(text) => Cow::Borrowed(text.as_bytes()),
        None => {
            warn!("{} is not valid UTF-8; its section header is approximate", path.display());
            Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::record::TagRecord;

    #[test]
    fn test_emit_section_frames_header() {
        let mut buffer = TagBuffer::new();
        buffer
            .append_record(&TagRecord::new("add", "int add(int a, int b)", 1, 4))
            .unwrap();

        let mut writer = TagsWriter::new(Vec::new());
        writer.emit_section(Path::new("foo.c"), &mut buffer).unwrap();

        let out = writer.into_inner();
        assert_eq!(out, b"\x0c\nfoo.c,30\nint add(int a, int b)\x7fadd\x011,4\n".to_vec());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_section_has_zero_length() {
        let mut buffer = TagBuffer::new();
        let mut writer = TagsWriter::new(Vec::new());
        writer.emit_section(Path::new("empty.h"), &mut buffer).unwrap();

        assert_eq!(writer.sections(), 1);
        assert_eq!(writer.into_inner(), b"\x0c\nempty.h,0\n".to_vec());
    }

    #[test]
    fn test_sections_follow_emit_order() {
        let mut buffer = TagBuffer::new();
        let mut writer = TagsWriter::new(Vec::new());

        buffer.append_record(&TagRecord::new("a", "int a;", 1, 4)).unwrap();
        writer.emit_section(Path::new("a.c"), &mut buffer).unwrap();
        buffer.append_record(&TagRecord::new("b", "int b;", 2, 11)).unwrap();
        writer.emit_section(Path::new("b.c"), &mut buffer).unwrap();

        let written = writer.bytes_written();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(written as usize, out.len());
        let a = out.find("a.c,").unwrap();
        let b = out.find("b.c,").unwrap();
        assert!(a < b);
        assert!(!out.contains("int a;\x7fa\x011,4\nint b;"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_written_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let file = Path::new(OsStr::from_bytes(b"src/caf\xe9.c"));
        let mut buffer = TagBuffer::new();
        let mut writer = TagsWriter::new(Vec::new());
        writer.emit_section(file, &mut buffer).unwrap();

        let written = writer.bytes_written();
        let out = writer.into_inner();
        assert_eq!(out, b"\x0c\nsrc/caf\xe9.c,0\n".to_vec());
        assert_eq!(written as usize, out.len());
    }
}
