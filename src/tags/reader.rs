use crate::error::{Result, TagsError};
use crate::tags::record::{TagRecord, NAME_DELIMITER, POSITION_DELIMITER, SECTION_DELIMITER};

/// A file section read back from TAGS data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub file: String,
    pub length: usize,
    pub records: Vec<TagRecord>,
}

fn malformed(position: usize, message: impl Into<String>) -> TagsError {
    TagsError::Format {
        position,
        message: message.into(),
    }
}

/// Parses a whole TAGS stream into its sections.
pub fn read_sections(data: &[u8]) -> Result<Vec<Section>> {
    let mut sections = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        if data.get(pos..pos + 2) != Some(&[SECTION_DELIMITER, b'\n'][..]) {
            return Err(malformed(pos, "expected section delimiter"));
        }
        pos += 2;

        let header_end = data[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| pos + i)
            .ok_or_else(|| malformed(pos, "unterminated section header"))?;
        let header = String::from_utf8_lossy(&data[pos..header_end]);
        let (file, length) = header
            .rsplit_once(',')
            .ok_or_else(|| malformed(pos, "section header without length"))?;
        let length: usize = length
            .parse()
            .map_err(|_| malformed(pos, format!("invalid section length '{length}'")))?;
        let file = file.to_string();
        pos = header_end + 1;

        let block = data
            .get(pos..pos.saturating_add(length))
            .ok_or_else(|| malformed(pos, format!("section {file} shorter than {length} bytes")))?;
        let records = read_records(block, pos)?;
        pos += length;

        sections.push(Section {
            file,
            length,
            records,
        });
    }

    Ok(sections)
}

fn read_records(block: &[u8], base: usize) -> Result<Vec<TagRecord>> {
    let mut records = Vec::new();
    let mut line_start = 0;

    for line in block.split(|&b| b == b'\n') {
        let at = base + line_start;
        line_start += line.len() + 1;
        if line.is_empty() {
            continue;
        }

        let name_at = line
            .iter()
            .position(|&b| b == NAME_DELIMITER)
            .ok_or_else(|| malformed(at, "record without name delimiter"))?;
        let pos_at = line[name_at..]
            .iter()
            .position(|&b| b == POSITION_DELIMITER)
            .map(|i| name_at + i)
            .ok_or_else(|| malformed(at, "record without position delimiter"))?;

        let position = String::from_utf8_lossy(&line[pos_at + 1..]);
        let (line_no, offset) = position
            .split_once(',')
            .ok_or_else(|| malformed(at, "record position without offset"))?;
        let line_no = line_no
            .parse()
            .map_err(|_| malformed(at, format!("invalid line number '{line_no}'")))?;
        let offset = offset
            .parse()
            .map_err(|_| malformed(at, format!("invalid byte offset '{offset}'")))?;

        records.push(TagRecord {
            name: String::from_utf8_lossy(&line[name_at + 1..pos_at]).into_owned(),
            search_text: String::from_utf8_lossy(&line[..name_at]).into_owned(),
            line: line_no,
            offset,
        });
    }

    Ok(records)
}
