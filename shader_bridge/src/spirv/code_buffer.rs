/// SpirvCodeBuffer - owned, mutable SPIR-V word stream

use std::io::Write;

use spirv as spv;

use crate::error::{Error, Result};

/// SPIR-V magic number (first header word)
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Number of words in the module header
pub const SPIRV_HEADER_WORDS: usize = 5;

/// Header word holding the id bound
const ID_BOUND_WORD: usize = 3;

/// Owned SPIR-V words
///
/// A buffer is either a full module (header + instructions) or a header-less
/// fragment used to assemble instructions before splicing them into a module.
/// Offsets are word offsets from the start of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpirvCodeBuffer {
    code: Vec<u32>,
    first_ins: usize,
}

impl SpirvCodeBuffer {
    /// Empty header-less fragment
    pub fn fragment() -> Self {
        Self {
            code: Vec::new(),
            first_ins: 0,
        }
    }

    /// Module with a SPIR-V 1.0 header and no instructions
    pub fn module(id_bound: u32) -> Self {
        Self {
            code: vec![SPIRV_MAGIC, 0x0001_0000, 0, id_bound, 0],
            first_ins: SPIRV_HEADER_WORDS,
        }
    }

    /// Wrap a complete module
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the words do not start with a SPIR-V header.
    pub fn from_words(code: Vec<u32>) -> Result<Self> {
        if code.len() < SPIRV_HEADER_WORDS {
            return Err(Error::InvalidResource(format!(
                "SPIR-V module has {} words, header alone needs {}",
                code.len(),
                SPIRV_HEADER_WORDS
            )));
        }
        if code[0] != SPIRV_MAGIC {
            return Err(Error::InvalidResource(format!(
                "bad SPIR-V magic 0x{:08x}",
                code[0]
            )));
        }

        Ok(Self {
            code,
            first_ins: SPIRV_HEADER_WORDS,
        })
    }

    /// Decode a little-endian module from raw bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidResource` if the length is not a multiple of 4 or the
    /// header is missing.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(Error::InvalidResource(format!(
                "SPIR-V code size {} is not a multiple of 4",
                bytes.len()
            )));
        }

        let words = match bytemuck::try_cast_slice::<u8, u32>(bytes) {
            Ok(words) if cfg!(target_endian = "little") => words.to_vec(),
            _ => bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        };

        Self::from_words(words)
    }

    pub fn words(&self) -> &[u32] {
        &self.code
    }

    /// The code as bytes, ready for `vkCreateShaderModule`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.code)
    }

    /// Length in words
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.code.len() * 4
    }

    pub fn word(&self, offset: usize) -> u32 {
        self.code[offset]
    }

    pub fn set_word(&mut self, offset: usize, value: u32) {
        self.code[offset] = value;
    }

    /// Current id bound (0 for fragments)
    pub fn id_bound(&self) -> u32 {
        if self.first_ins == SPIRV_HEADER_WORDS {
            self.code[ID_BOUND_WORD]
        } else {
            0
        }
    }

    /// Reserve a fresh result id by bumping the header's id bound
    ///
    /// Must only be called on a module, never on a fragment.
    pub fn alloc_id(&mut self) -> u32 {
        debug_assert_eq!(self.first_ins, SPIRV_HEADER_WORDS, "alloc_id on a fragment");
        let id = self.code[ID_BOUND_WORD];
        self.code[ID_BOUND_WORD] = id + 1;
        id
    }

    /// Append an instruction header word
    pub fn put_ins(&mut self, op: spv::Op, word_count: u32) {
        self.code.push((word_count << 16) | (op as u32 & 0xffff));
    }

    /// Append a single word
    pub fn put_word(&mut self, word: u32) {
        self.code.push(word);
    }

    /// Append a literal string, NUL-terminated and padded to a word boundary
    pub fn put_str(&mut self, s: &str) {
        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0);
        while bytes.len() % 4 != 0 {
            bytes.push(0);
        }
        for chunk in bytes.chunks_exact(4) {
            self.code
                .push(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
    }

    /// Words occupied by `s` as a literal string
    pub fn str_len(s: &str) -> u32 {
        (s.len() as u32 + 4) / 4
    }

    /// Remove the words in `begin..end`
    pub fn erase(&mut self, begin: usize, end: usize) {
        self.code.drain(begin..end);
    }

    /// Splice the words of `other` in at `offset`
    pub fn insert(&mut self, offset: usize, other: &SpirvCodeBuffer) {
        self.code
            .splice(offset..offset, other.code.iter().copied());
    }

    /// Rewrite the word count of the instruction at `offset`, keeping its opcode
    pub fn set_ins_length(&mut self, offset: usize, word_count: u32) {
        let opcode = self.code[offset] & 0xffff;
        self.code[offset] = (word_count << 16) | opcode;
    }

    /// Iterate over the instructions, skipping the header
    ///
    /// Iteration stops early at an instruction with a zero word count or one
    /// that runs past the end of the buffer.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            code: &self.code,
            offset: self.first_ins,
        }
    }

    /// Write the module in its binary form
    pub fn store<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.as_bytes())?;
        writer.flush()
    }
}

impl<'a> IntoIterator for &'a SpirvCodeBuffer {
    type Item = SpirvInstruction<'a>;
    type IntoIter = Instructions<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions()
    }
}

/// Read-only view of one instruction
#[derive(Debug, Clone, Copy)]
pub struct SpirvInstruction<'a> {
    words: &'a [u32],
    offset: usize,
}

impl<'a> SpirvInstruction<'a> {
    /// Word offset of the instruction in its buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Raw opcode value
    pub fn opcode(&self) -> u32 {
        self.words[0] & 0xffff
    }

    pub fn is(&self, op: spv::Op) -> bool {
        self.opcode() == op as u32
    }

    /// Word count, including the header word
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word `index` of the instruction (0 is the opcode/length word).
    /// Out-of-range reads yield 0.
    pub fn arg(&self, index: usize) -> u32 {
        self.words.get(index).copied().unwrap_or(0)
    }

    /// Number of words used by the literal string starting at word `index`
    pub fn string_words(&self, index: usize) -> usize {
        let tail = self.words.get(index..).unwrap_or(&[]);
        for (i, word) in tail.iter().enumerate() {
            if word.to_le_bytes().contains(&0) {
                return i + 1;
            }
        }
        tail.len()
    }

    /// Literal string starting at word `index`
    pub fn string(&self, index: usize) -> String {
        let end = (index + self.string_words(index)).min(self.words.len());
        let bytes: Vec<u8> = self.words[index.min(end)..end]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .take_while(|&b| b != 0)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Iterator over the instructions of a buffer
pub struct Instructions<'a> {
    code: &'a [u32],
    offset: usize,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = SpirvInstruction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = *self.code.get(self.offset)?;
        let count = (header >> 16) as usize;
        if count == 0 || self.offset + count > self.code.len() {
            return None;
        }

        let ins = SpirvInstruction {
            words: &self.code[self.offset..self.offset + count],
            offset: self.offset,
        };
        self.offset += count;
        Some(ins)
    }
}

#[cfg(test)]
#[path = "code_buffer_tests.rs"]
mod tests;
