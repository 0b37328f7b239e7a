/// DxbcReader - bounds-checked little-endian reader over one chunk payload

use crate::error::{Error, Result};

/// Cursor over a chunk payload
///
/// All offsets are relative to the start of the chunk, so a reader created
/// with `clone_at` can follow offsets stored inside the chunk itself.
#[derive(Debug, Clone, Copy)]
pub struct DxbcReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DxbcReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Total chunk size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read one little-endian `u32` and advance
    pub fn read_u32(&mut self) -> Result<u32> {
        let end = self
            .pos
            .checked_add(4)
            .ok_or_else(|| Error::DecodeFailed("read offset overflows".to_string()))?;
        let bytes = self.data.get(self.pos..end).ok_or_else(|| {
            Error::DecodeFailed(format!(
                "need 4 bytes at {}..{}, chunk length is {}",
                self.pos,
                end,
                self.data.len()
            ))
        })?;

        self.pos = end;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Advance the cursor by `count` bytes
    pub fn skip(&mut self, count: usize) -> Result<()> {
        let end = self.pos.checked_add(count).filter(|&end| end <= self.data.len());
        match end {
            Some(end) => {
                self.pos = end;
                Ok(())
            }
            None => Err(Error::DecodeFailed(format!(
                "cannot skip {} bytes at {}, chunk length is {}",
                count,
                self.pos,
                self.data.len()
            ))),
        }
    }

    /// A second reader over the same chunk, positioned at `offset`
    pub fn clone_at(&self, offset: usize) -> Result<DxbcReader<'a>> {
        if offset > self.data.len() {
            return Err(Error::DecodeFailed(format!(
                "offset {} is outside chunk length {}",
                offset,
                self.data.len()
            )));
        }
        Ok(DxbcReader {
            data: self.data,
            pos: offset,
        })
    }

    /// Read a NUL-terminated string and advance past the terminator
    pub fn read_string(&mut self) -> Result<String> {
        let tail = &self.data[self.pos.min(self.data.len())..];
        let len = tail.iter().position(|&b| b == 0).ok_or_else(|| {
            Error::DecodeFailed(format!(
                "string at offset {} runs past the end of the chunk",
                self.pos
            ))
        })?;

        let s = std::str::from_utf8(&tail[..len]).map_err(|_| {
            Error::DecodeFailed(format!("string at offset {} is not valid UTF-8", self.pos))
        })?;

        self.pos += len + 1;
        Ok(s.to_owned())
    }
}
