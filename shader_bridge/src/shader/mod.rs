/// Shader module - shader objects, resource slots and interface masks

pub mod interface;
#[allow(clippy::module_inception)]
pub mod shader;
pub mod slots;
pub mod stage;

pub use interface::{InterfaceSlots, MAX_INTERFACE_REGS};
pub use shader::{Shader, ShaderModule, ShaderModuleCreateInfo};
pub use slots::{
    DescriptorBinding, DescriptorSlotMapping, DescriptorType, ImageViewType, PushConstRange,
    ResourceSlot,
};
pub use stage::{ShaderStage, ShaderStageFlags};
