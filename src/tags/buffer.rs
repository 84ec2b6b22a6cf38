use std::io::Write;
use std::ops::Deref;

use crate::error::Result;
use crate::tags::record::TagRecord;

pub const INITIAL_CAPACITY: usize = 16;

/// Accumulates the serialized records of one file section.
///
/// The buffer is reused for every file of a run. Its logical capacity starts at
/// [`INITIAL_CAPACITY`] and doubles until a pending write fits, so growth costs
/// amortized O(1) per append. Resetting keeps the allocation.
#[derive(Debug)]
pub struct TagBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl TagBuffer {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        self.grow_for(data.len())?;
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    /// Serializes `record` as one newline-terminated TAGS line.
    pub fn append_record(&mut self, record: &TagRecord) -> Result<()> {
        self.grow_for(record.serialized_len())?;
        writeln!(self.bytes, "{record}")?;
        Ok(())
    }

    /// Hands out the current contents; the write cursor returns to zero once the
    /// snapshot is dropped.
    pub fn snapshot_and_reset(&mut self) -> Snapshot<'_> {
        Snapshot { buffer: self }
    }

    fn grow_for(&mut self, additional: usize) -> Result<()> {
        let needed = self.bytes.len().saturating_add(additional);
        if needed <= self.capacity {
            return Ok(());
        }

        let mut capacity = self.capacity;
        while capacity < needed {
            capacity = capacity.saturating_mul(2);
        }

        self.bytes.try_reserve_exact(capacity - self.bytes.len())?;
        self.capacity = capacity;
        Ok(())
    }
}

impl Default for TagBuffer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Snapshot<'a> {
    buffer: &'a mut TagBuffer,
}

impl Deref for Snapshot<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buffer.bytes
    }
}

impl Drop for Snapshot<'_> {
    fn drop(&mut self) {
        self.buffer.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = TagBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), INITIAL_CAPACITY);
    }

    #[test]
    fn test_append_within_capacity_keeps_capacity() {
        let mut buffer = TagBuffer::new();
        buffer.append(b"0123456789").unwrap();
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.capacity(), INITIAL_CAPACITY);
    }

    #[test]
    fn test_capacity_doubles_until_write_fits() {
        let mut buffer = TagBuffer::new();
        buffer.append(&[b'a'; 100]).unwrap();

        assert_eq!(buffer.capacity(), 128);
        assert_eq!(buffer.len(), 100);
    }

    #[test]
    fn test_many_records_are_kept_in_order() {
        let mut buffer = TagBuffer::new();
        for i in 0..500u32 {
            let record = TagRecord::new(format!("sym{i}"), format!("int sym{i}(void)"), i + 1, i * 10);
            buffer.append_record(&record).unwrap();
        }

        let text = String::from_utf8(buffer.as_bytes().to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 500);
        assert_eq!(lines[0], "int sym0(void)\x7fsym0\x011,0");
        assert_eq!(lines[499], "int sym499(void)\x7fsym499\x01500,4990");
        assert!(buffer.len() <= buffer.capacity());
    }

    #[test]
    fn test_snapshot_resets_but_keeps_capacity() {
        let mut buffer = TagBuffer::new();
        buffer.append(&[b'x'; 40]).unwrap();
        let grown = buffer.capacity();

        {
            let snapshot = buffer.snapshot_and_reset();
            assert_eq!(snapshot.len(), 40);
            assert!(snapshot.iter().all(|b| *b == b'x'));
        }

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), grown);
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let mut buffer = TagBuffer::with_capacity(0);
        buffer.append(b"abc").unwrap();
        assert_eq!(buffer.capacity(), 4);
    }
}
