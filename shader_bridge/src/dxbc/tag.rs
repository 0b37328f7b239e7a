/// DxbcTag - four-character chunk identifier

use std::fmt;

/// Four-character chunk tag (`ISGN`, `OSG5`, `SHEX`, ...)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DxbcTag(pub [u8; 4]);

impl DxbcTag {
    pub const ISGN: Self = Self(*b"ISGN");
    pub const OSGN: Self = Self(*b"OSGN");
    pub const PCSG: Self = Self(*b"PCSG");
    pub const ISG1: Self = Self(*b"ISG1");
    pub const OSG1: Self = Self(*b"OSG1");
    pub const PSG1: Self = Self(*b"PSG1");
    pub const OSG5: Self = Self(*b"OSG5");

    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }

    /// Signature entries under this tag carry a leading stream id word
    pub fn has_stream(self) -> bool {
        self == Self::ISG1 || self == Self::OSG1 || self == Self::PSG1 || self == Self::OSG5
    }

    /// Signature entries under this tag carry a trailing min-precision word
    pub fn has_precision(self) -> bool {
        self == Self::ISG1 || self == Self::OSG1 || self == Self::PSG1
    }
}

impl From<[u8; 4]> for DxbcTag {
    fn from(tag: [u8; 4]) -> Self {
        Self(tag)
    }
}

impl PartialEq<&str> for DxbcTag {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl fmt::Display for DxbcTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DxbcTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DxbcTag({})", self)
    }
}
