//! Big-endian primitives over an in-memory byte buffer.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{PakError, Result};

/// Reads big-endian integers and NUL-terminated strings, advancing as it goes.
///
/// Every read is bounds-checked; running off the end of the buffer is a
/// format error, never a panic.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn truncated(&self, what: &str, at: u64) -> PakError {
        PakError::format(format!(
            "truncated {} at offset {} (buffer is {} bytes)",
            what,
            at,
            self.cursor.get_ref().len()
        ))
    }

    pub fn read_u32(&mut self, what: &str) -> Result<u32> {
        let at = self.position();
        self.cursor
            .read_u32::<BigEndian>()
            .map_err(|_| self.truncated(what, at))
    }

    pub fn read_u64(&mut self, what: &str) -> Result<u64> {
        let at = self.position();
        self.cursor
            .read_u64::<BigEndian>()
            .map_err(|_| self.truncated(what, at))
    }

    /// Read a reserved field, which must be zero.
    pub fn read_reserved(&mut self, what: &str) -> Result<()> {
        let at = self.position();
        match self.read_u32(what)? {
            0 => Ok(()),
            value => Err(PakError::format(format!(
                "reserved field in {what} at offset {at} is {value:#x}, expected 0"
            ))),
        }
    }

    /// Read a NUL-terminated UTF-8 string and check it against the declared
    /// on-wire length (which includes the terminator).
    pub fn read_name(&mut self, declared_len: u32, what: &str) -> Result<String> {
        let data = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let rest = data.get(start..).unwrap_or_default();
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.truncated(what, start as u64))?;

        if nul as u64 + 1 != declared_len as u64 {
            return Err(PakError::format(format!(
                "{what} at offset {start} declares length {declared_len} but is {} bytes long",
                nul + 1
            )));
        }

        let name = std::str::from_utf8(&rest[..nul])
            .map_err(|_| PakError::format(format!("{what} at offset {start} is not valid UTF-8")))?
            .to_string();
        self.cursor.set_position((start + nul + 1) as u64);
        Ok(name)
    }

    /// Borrow `len` bytes starting at an absolute `offset` without moving the cursor.
    pub fn slice_at(&self, offset: u64, len: u64, what: &str) -> Result<&'a [u8]> {
        let data: &'a [u8] = *self.cursor.get_ref();
        offset
            .checked_add(len)
            .filter(|&end| end <= data.len() as u64)
            .map(|end| &data[offset as usize..end as usize])
            .ok_or_else(|| {
                PakError::format(format!(
                    "{what}: {len} bytes at offset {offset} exceed archive size {}",
                    data.len()
                ))
            })
    }
}

/// Appends big-endian integers and NUL-terminated strings to a buffer.
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn position(&self) -> u64 {
        self.buf.len() as u64
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_reserved(&mut self) {
        self.write_u32(0);
    }

    pub fn write_name(&mut self, name: &str) {
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.push(0);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
