//! SPIR-V instruction stream handling
//!
//! Two phases over a shader template:
//! - `ShaderAnnotations::scan` runs once and records patchable operand offsets
//! - `specialize` clones the template and rewrites the clone

pub mod annotations;
pub mod code_buffer;
pub mod patcher;
pub mod type_graph;

#[cfg(test)]
pub(crate) mod test_module;

pub use annotations::{MarkerKind, PatchMarker, ShaderAnnotations, ShaderFlags};
pub use code_buffer::{SpirvCodeBuffer, SpirvInstruction, SPIRV_HEADER_WORDS, SPIRV_MAGIC};
pub use patcher::{
    eliminate_input, specialize, BindingMap, SpecializationParams, MAX_NUM_RESOURCE_SLOTS,
};
pub use type_graph::{ChainLink, InputVariable, TypeGraph, TypeKind, TypeNode};
