//! DXBC container helpers
//!
//! Only the interface signature chunks are decoded here; the shader bytecode
//! itself arrives already translated to SPIR-V.

pub mod reader;
pub mod signature;
pub mod tag;

pub use reader::DxbcReader;
pub use signature::{
    RegMask, SignatureComponentType, SignatureEntry, SignatureTable, SystemValue,
};
pub use tag::DxbcTag;
