/// Resource slot declarations and the slot-to-binding accumulator
///
/// Every shader of a pipeline registers its slots into one
/// `DescriptorSlotMapping`. The order of first registration decides the
/// final binding id of each slot.

use rustc_hash::FxHashMap;

use crate::render::AccessFlags;
use crate::shader::stage::{ShaderStage, ShaderStageFlags};
use crate::spirv::BindingMap;

// ============================================================================
// Slot declarations
// ============================================================================

/// Type of resource bound at a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    Sampler,
    CombinedImageSampler,
    SampledImage,
    StorageImage,
    UniformTexelBuffer,
    StorageTexelBuffer,
    UniformBuffer,
    StorageBuffer,
    UniformBufferDynamic,
    StorageBufferDynamic,
}

/// Image view dimensionality expected by an image slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageViewType {
    Image1D,
    Image2D,
    Image3D,
    Cube,
    Image1DArray,
    Image2DArray,
    CubeArray,
}

/// One resource slot as declared by a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceSlot {
    /// Logical slot id used by the shader's binding decorations
    pub slot: u32,
    pub descriptor_type: DescriptorType,
    /// View type for image slots, `None` for buffers and samplers
    pub view_type: Option<ImageViewType>,
    /// How the shader accesses the resource
    pub access: AccessFlags,
}

impl ResourceSlot {
    pub fn new(slot: u32, descriptor_type: DescriptorType) -> Self {
        Self {
            slot,
            descriptor_type,
            view_type: None,
            access: AccessFlags::SHADER_READ,
        }
    }

    pub fn with_view_type(mut self, view_type: ImageViewType) -> Self {
        self.view_type = Some(view_type);
        self
    }

    pub fn with_access(mut self, access: AccessFlags) -> Self {
        self.access = access;
        self
    }
}

// ============================================================================
// Mapping
// ============================================================================

/// A slot after merging every stage that declared it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorBinding {
    pub slot: u32,
    pub descriptor_type: DescriptorType,
    pub view_type: Option<ImageViewType>,
    pub stages: ShaderStageFlags,
    pub access: AccessFlags,
}

/// Push constant range shared by every stage of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PushConstRange {
    /// Offset in bytes
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
    pub stages: ShaderStageFlags,
}

/// Accumulates resource slots of all shaders in a pipeline
#[derive(Debug, Clone, Default)]
pub struct DescriptorSlotMapping {
    bindings: Vec<DescriptorBinding>,
    index: FxHashMap<u32, u32>,
    push_const: Option<PushConstRange>,
}

impl DescriptorSlotMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `slot` as used by `stage`
    ///
    /// A slot registered before keeps its binding id; the new stage and
    /// access are merged into it.
    pub fn define_slot(&mut self, stage: ShaderStage, slot: &ResourceSlot) {
        match self.index.get(&slot.slot) {
            Some(&binding_id) => {
                let binding = &mut self.bindings[binding_id as usize];
                binding.stages |= stage.flag();
                binding.access |= slot.access;
            }
            None => {
                self.index.insert(slot.slot, self.bindings.len() as u32);
                self.bindings.push(DescriptorBinding {
                    slot: slot.slot,
                    descriptor_type: slot.descriptor_type,
                    view_type: slot.view_type,
                    stages: stage.flag(),
                    access: slot.access,
                });
            }
        }
    }

    /// Grow the push constant range to cover `offset..offset + size`
    pub fn define_push_const_range(&mut self, stage: ShaderStage, offset: u32, size: u32) {
        self.push_const = Some(match self.push_const {
            None => PushConstRange {
                offset,
                size,
                stages: stage.flag(),
            },
            Some(range) => {
                let begin = range.offset.min(offset);
                let end = range
                    .offset
                    .saturating_add(range.size)
                    .max(offset.saturating_add(size));
                PushConstRange {
                    offset: begin,
                    size: end - begin,
                    stages: range.stages | stage.flag(),
                }
            }
        });
    }

    /// Final binding id of `slot`, `None` if no shader declared it
    pub fn binding_id(&self, slot: u32) -> Option<u32> {
        self.index.get(&slot).copied()
    }

    /// Bindings in binding id order
    pub fn bindings(&self) -> &[DescriptorBinding] {
        &self.bindings
    }

    pub fn binding_count(&self) -> u32 {
        self.bindings.len() as u32
    }

    pub fn push_const_range(&self) -> Option<PushConstRange> {
        self.push_const
    }
}

impl BindingMap for DescriptorSlotMapping {
    fn binding_id(&self, slot: u32) -> Option<u32> {
        DescriptorSlotMapping::binding_id(self, slot)
    }
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod tests;
