//! Read-only annotation pass over a shader template
//!
//! Records the word offsets that specialization later rewrites, so the
//! mutate pass never has to search the module for them again.

use rustc_hash::FxHashMap;
use spirv as spv;

use crate::spirv::code_buffer::SpirvCodeBuffer;

bitflags::bitflags! {
    /// Properties of a shader derived from its execution modes and capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShaderFlags: u32 {
        const EXPORTS_STENCIL_REF = 1 << 0;
        const HAS_TRANSFORM_FEEDBACK = 1 << 1;
        const HAS_SAMPLE_RATE_SHADING = 1 << 2;
        const EXPORTS_VIEWPORT_INDEX_LAYER_FROM_VERTEX_STAGE = 1 << 3;
    }
}

/// What a recorded operand encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `Binding` decoration literal
    BindingId,
    /// `SpecId` decoration literal
    SpecConstantId,
    /// `Location` literal of the output at location 1
    OutputLocation1,
    /// `Index` literal of that same output
    OutputIndex1,
}

/// Word offset of an operand that specialization may rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchMarker {
    pub kind: MarkerKind,
    pub offset: usize,
}

/// Result of scanning a template module once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderAnnotations {
    markers: Vec<PatchMarker>,
    flags: ShaderFlags,
}

impl ShaderAnnotations {
    /// Scan `code` and record every patchable operand
    pub fn scan(code: &SpirvCodeBuffer) -> Self {
        let mut markers = Vec::new();
        let mut flags = ShaderFlags::empty();

        // Location 1 and Index decorations, keyed by target id
        let mut location1: FxHashMap<u32, usize> = FxHashMap::default();
        let mut index: FxHashMap<u32, usize> = FxHashMap::default();
        let mut location1_order: Vec<u32> = Vec::new();

        for ins in code {
            if ins.is(spv::Op::Decorate) {
                let target = ins.arg(1);
                let decoration = ins.arg(2);
                let literal_offset = ins.offset() + 3;

                if decoration == spv::Decoration::Binding as u32 {
                    markers.push(PatchMarker {
                        kind: MarkerKind::BindingId,
                        offset: literal_offset,
                    });
                } else if decoration == spv::Decoration::SpecId as u32 {
                    markers.push(PatchMarker {
                        kind: MarkerKind::SpecConstantId,
                        offset: literal_offset,
                    });
                } else if decoration == spv::Decoration::Location as u32 && ins.arg(3) == 1 {
                    if location1.insert(target, literal_offset).is_none() {
                        location1_order.push(target);
                    }
                } else if decoration == spv::Decoration::Index as u32 {
                    index.insert(target, literal_offset);
                }
            } else if ins.is(spv::Op::ExecutionMode) {
                let mode = ins.arg(2);
                if mode == spv::ExecutionMode::StencilRefReplacingEXT as u32 {
                    flags |= ShaderFlags::EXPORTS_STENCIL_REF;
                }
                if mode == spv::ExecutionMode::Xfb as u32 {
                    flags |= ShaderFlags::HAS_TRANSFORM_FEEDBACK;
                }
            } else if ins.is(spv::Op::Capability) {
                let capability = ins.arg(1);
                if capability == spv::Capability::SampleRateShading as u32 {
                    flags |= ShaderFlags::HAS_SAMPLE_RATE_SHADING;
                }
                if capability == spv::Capability::ShaderViewportIndexLayerEXT as u32 {
                    flags |= ShaderFlags::EXPORTS_VIEWPORT_INDEX_LAYER_FROM_VERTEX_STAGE;
                }
            }
        }

        // Inputs can sit at location 1 too; only an output with an Index
        // decoration takes part in the dual-source swap
        let output = location1_order
            .iter()
            .find_map(|id| index.get(id).map(|&idx| (location1[id], idx)));

        if let Some((location_offset, index_offset)) = output {
            markers.push(PatchMarker {
                kind: MarkerKind::OutputLocation1,
                offset: location_offset,
            });
            markers.push(PatchMarker {
                kind: MarkerKind::OutputIndex1,
                offset: index_offset,
            });
        }

        Self { markers, flags }
    }

    pub fn markers(&self) -> &[PatchMarker] {
        &self.markers
    }

    pub fn flags(&self) -> ShaderFlags {
        self.flags
    }

    /// Offsets of every binding and specialization constant id
    pub fn id_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.markers
            .iter()
            .filter(|m| matches!(m.kind, MarkerKind::BindingId | MarkerKind::SpecConstantId))
            .map(|m| m.offset)
    }

    /// Offset of the first marker of `kind`
    pub fn offset_of(&self, kind: MarkerKind) -> Option<usize> {
        self.markers.iter().find(|m| m.kind == kind).map(|m| m.offset)
    }
}

#[cfg(test)]
#[path = "annotations_tests.rs"]
mod tests;
