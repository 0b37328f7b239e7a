//! Signature chunk decoding (`ISGN`, `OSGN`, `PCSG`, `ISG1`, `OSG1`, `PSG1`, `OSG5`)
//!
//! A signature chunk lists the input or output elements of one shader stage.
//! Each element binds a semantic (name + index) to a register and component
//! mask. The field layout depends on the chunk tag:
//!
//! | tag                  | stream word | precision word |
//! |----------------------|-------------|----------------|
//! | `ISG1` `OSG1` `PSG1` | yes         | yes            |
//! | `OSG5`               | yes         | no             |
//! | anything else        | no          | no             |

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::dxbc::reader::DxbcReader;
use crate::dxbc::tag::DxbcTag;
use crate::error::{Error, Result};
use crate::log::Log;

/// Component mask of one register (bit 0 = x ... bit 3 = w)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegMask(u8);

impl RegMask {
    pub const X: Self = Self(0x1);
    pub const Y: Self = Self(0x2);
    pub const Z: Self = Self(0x4);
    pub const W: Self = Self(0x8);
    pub const XYZW: Self = Self(0xf);

    /// Build from raw bits; anything above bit 3 is dropped
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0xf)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of enabled components
    pub const fn pop_count(self) -> u32 {
        self.0.count_ones()
    }

    /// `xyzw`-style rendering with `_` for disabled components
    pub fn mask_string(self) -> String {
        "xyzw"
            .chars()
            .enumerate()
            .map(|(i, c)| if self.0 & (1 << i) != 0 { c } else { '_' })
            .collect()
    }
}

impl BitOr for RegMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RegMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Scalar type of a register component
///
/// The chunk stores this as an index into a fixed table of four entries.
/// Widening that table is a format change, not a range extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureComponentType {
    /// Untyped/packed data, handled as 32-bit unsigned
    Unknown,
    Uint32,
    Sint32,
    Float32,
}

impl SignatureComponentType {
    const TABLE: [SignatureComponentType; 4] = [
        SignatureComponentType::Unknown,
        SignatureComponentType::Uint32,
        SignatureComponentType::Sint32,
        SignatureComponentType::Float32,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::TABLE.get(index as usize).copied()
    }

    /// Whether values of this type are read as 32-bit unsigned integers
    pub fn is_unsigned(self) -> bool {
        matches!(self, SignatureComponentType::Unknown | SignatureComponentType::Uint32)
    }
}

/// System-value classification of an element (`D3D_NAME`), kept as the raw code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SystemValue(pub u32);

impl SystemValue {
    pub const NONE: Self = Self(0);
    pub const POSITION: Self = Self(1);
    pub const CLIP_DISTANCE: Self = Self(2);
    pub const CULL_DISTANCE: Self = Self(3);
    pub const RENDER_TARGET_ARRAY_INDEX: Self = Self(4);
    pub const VIEWPORT_ARRAY_INDEX: Self = Self(5);
    pub const VERTEX_ID: Self = Self(6);
    pub const PRIMITIVE_ID: Self = Self(7);
    pub const INSTANCE_ID: Self = Self(8);
    pub const IS_FRONT_FACE: Self = Self(9);
    pub const SAMPLE_INDEX: Self = Self(10);
    pub const TARGET: Self = Self(64);
    pub const DEPTH: Self = Self(65);
    pub const COVERAGE: Self = Self(66);
    pub const DEPTH_GREATER_EQUAL: Self = Self(67);
    pub const DEPTH_LESS_EQUAL: Self = Self(68);
    pub const STENCIL_REF: Self = Self(69);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// One interface element of a signature chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntry {
    /// Semantic name, compared case-insensitively
    pub semantic_name: String,
    pub semantic_index: u32,
    pub system_value: SystemValue,
    pub component_type: SignatureComponentType,
    /// Logical register the element lives in
    pub register_id: u32,
    pub component_mask: RegMask,
    /// Geometry-shader stream (0 unless the tag carries stream ids)
    pub stream_id: u32,
}

impl fmt::Display for SignatureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} -> v{}.{} ({:?}, sv {}, stream {})",
            self.semantic_name,
            self.semantic_index,
            self.register_id,
            self.component_mask.mask_string(),
            self.component_type,
            self.system_value.0,
            self.stream_id
        )
    }
}

/// Ordered, immutable list of signature entries for one stage direction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureTable {
    entries: Vec<SignatureEntry>,
}

impl SignatureTable {
    /// Decode a signature chunk
    ///
    /// # Arguments
    ///
    /// * `reader` - Reader positioned at the start of the chunk payload
    /// * `tag` - Chunk tag; selects the per-element field layout
    ///
    /// # Errors
    ///
    /// Returns `DecodeFailed` on truncated input, an out-of-range component
    /// type index or an unterminated semantic name. No partial table is ever
    /// returned.
    pub fn parse(mut reader: DxbcReader<'_>, tag: DxbcTag) -> Result<Self> {
        let element_count = reader
            .read_u32()
            .map_err(|e| chunk_error(tag, "element count", e))?;
        reader
            .skip(4)
            .map_err(|e| chunk_error(tag, "reserved word", e))?;

        let has_stream = tag.has_stream();
        let has_precision = tag.has_precision();

        // Each element is at least six words; reject counts the chunk cannot hold
        let min_entry_size = 24usize;
        if (element_count as usize).saturating_mul(min_entry_size) > reader.remaining() {
            return Err(Error::DecodeFailed(format!(
                "{}: {} elements do not fit in {} remaining bytes",
                tag,
                element_count,
                reader.remaining()
            )));
        }

        let mut entries = Vec::with_capacity(element_count as usize);
        for index in 0..element_count {
            let entry = Self::parse_entry(&mut reader, has_stream, has_precision)
                .map_err(|e| chunk_error(tag, &format!("entry {}", index), e))?;
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    fn parse_entry(
        reader: &mut DxbcReader<'_>,
        has_stream: bool,
        has_precision: bool,
    ) -> Result<SignatureEntry> {
        let stream_id = if has_stream { reader.read_u32()? } else { 0 };

        let name_offset = reader.read_u32()?;
        let semantic_name = reader.clone_at(name_offset as usize)?.read_string()?;

        let semantic_index = reader.read_u32()?;
        let system_value = SystemValue(reader.read_u32()?);

        let type_index = reader.read_u32()?;
        let component_type = SignatureComponentType::from_index(type_index).ok_or_else(|| {
            Error::DecodeFailed(format!("component type index {} is out of range", type_index))
        })?;

        let register_id = reader.read_u32()?;
        let component_mask = RegMask::from_bits((reader.read_u32()? & 0xf) as u8);

        if has_precision {
            // Min-precision qualifier is not used downstream
            reader.read_u32()?;
        }

        Ok(SignatureEntry {
            semantic_name,
            semantic_index,
            system_value,
            component_type,
            register_id,
            component_mask,
            stream_id,
        })
    }

    /// Build a table from already decoded entries
    pub fn from_entries(entries: Vec<SignatureEntry>) -> Self {
        Self { entries }
    }

    /// Entries in chunk order
    pub fn iter(&self) -> std::slice::Iter<'_, SignatureEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[SignatureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry bound to `register_id`
    pub fn find_by_register(&self, register_id: u32) -> Option<&SignatureEntry> {
        self.entries.iter().find(|e| e.register_id == register_id)
    }

    /// Entry with the given semantic (name compared case-insensitively) and stream
    pub fn find(
        &self,
        semantic_name: &str,
        semantic_index: u32,
        stream_id: u32,
    ) -> Option<&SignatureEntry> {
        self.entries.iter().find(|e| {
            e.semantic_index == semantic_index
                && e.stream_id == stream_id
                && e.semantic_name.eq_ignore_ascii_case(semantic_name)
        })
    }

    /// Union of the component masks of every entry in `register_id`
    pub fn reg_mask(&self, register_id: u32) -> RegMask {
        self.entries
            .iter()
            .filter(|e| e.register_id == register_id)
            .fold(RegMask::default(), |mask, e| mask | e.component_mask)
    }

    /// Highest register id plus one (0 for an empty table)
    pub fn max_register_count(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.register_id.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Dump every entry at debug severity
    pub fn print_entries(&self, log: &Log) {
        for entry in &self.entries {
            crate::bridge_debug!(log, "bridge::dxbc", "SGN entry: {}", entry);
        }
    }
}

impl<'a> IntoIterator for &'a SignatureTable {
    type Item = &'a SignatureEntry;
    type IntoIter = std::slice::Iter<'a, SignatureEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn chunk_error(tag: DxbcTag, what: &str, err: Error) -> Error {
    match err {
        Error::DecodeFailed(msg) => Error::DecodeFailed(format!("{} {}: {}", tag, what, msg)),
        other => other,
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
