/// Load/store operations, barriers and the Vulkan-valued flag sets they use

use crate::render::format::{ImageLayout, RenderPassFormat, MAX_NUM_RENDER_TARGETS};

bitflags::bitflags! {
    /// Pipeline stages (values match `VkPipelineStageFlagBits`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PipelineStages: u32 {
        const TOP_OF_PIPE = 0x0000_0001;
        const DRAW_INDIRECT = 0x0000_0002;
        const VERTEX_INPUT = 0x0000_0004;
        const VERTEX_SHADER = 0x0000_0008;
        const FRAGMENT_SHADER = 0x0000_0080;
        const EARLY_FRAGMENT_TESTS = 0x0000_0100;
        const LATE_FRAGMENT_TESTS = 0x0000_0200;
        const COLOR_ATTACHMENT_OUTPUT = 0x0000_0400;
        const COMPUTE_SHADER = 0x0000_0800;
        const TRANSFER = 0x0000_1000;
        const BOTTOM_OF_PIPE = 0x0000_2000;
        const HOST = 0x0000_4000;
        const ALL_GRAPHICS = 0x0000_8000;
        const ALL_COMMANDS = 0x0001_0000;
        const TRANSFORM_FEEDBACK = 0x0100_0000;
    }
}

bitflags::bitflags! {
    /// Memory access types (values match `VkAccessFlagBits`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessFlags: u32 {
        const INDIRECT_COMMAND_READ = 0x0000_0001;
        const INDEX_READ = 0x0000_0002;
        const VERTEX_ATTRIBUTE_READ = 0x0000_0004;
        const UNIFORM_READ = 0x0000_0008;
        const INPUT_ATTACHMENT_READ = 0x0000_0010;
        const SHADER_READ = 0x0000_0020;
        const SHADER_WRITE = 0x0000_0040;
        const COLOR_ATTACHMENT_READ = 0x0000_0080;
        const COLOR_ATTACHMENT_WRITE = 0x0000_0100;
        const DEPTH_STENCIL_ATTACHMENT_READ = 0x0000_0200;
        const DEPTH_STENCIL_ATTACHMENT_WRITE = 0x0000_0400;
        const TRANSFER_READ = 0x0000_0800;
        const TRANSFER_WRITE = 0x0000_1000;
        const HOST_READ = 0x0000_2000;
        const HOST_WRITE = 0x0000_4000;
        const MEMORY_READ = 0x0000_8000;
        const MEMORY_WRITE = 0x0001_0000;
        const TRANSFORM_FEEDBACK_WRITE = 0x0200_0000;
        const TRANSFORM_FEEDBACK_COUNTER_READ = 0x0400_0000;
        const TRANSFORM_FEEDBACK_COUNTER_WRITE = 0x0800_0000;
    }
}

bitflags::bitflags! {
    /// Image aspects (values match `VkImageAspectFlagBits`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ImageAspectFlags: u32 {
        const COLOR = 0x1;
        const DEPTH = 0x2;
        const STENCIL = 0x4;
    }
}

bitflags::bitflags! {
    /// Subpass dependency flags (values match `VkDependencyFlagBits`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DependencyFlags: u32 {
        const BY_REGION = 0x1;
    }
}

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadOp {
    /// Load existing content
    #[default]
    Load,
    /// Clear the content
    Clear,
    /// Don't care about existing content
    DontCare,
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreOp {
    /// Store the rendered content
    #[default]
    Store,
    /// Don't care about storing the content
    DontCare,
}

/// Load op and layout transition of one color attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorOps {
    pub load_op: LoadOp,
    pub load_layout: ImageLayout,
    pub store_layout: ImageLayout,
}

/// Load ops and layout transition of the depth/stencil attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DepthOps {
    pub load_op_d: LoadOp,
    pub load_op_s: LoadOp,
    pub load_layout: ImageLayout,
    pub store_layout: ImageLayout,
}

/// Synchronization the caller needs after the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderPassBarrier {
    pub src_stages: PipelineStages,
    pub src_access: AccessFlags,
    pub dst_stages: PipelineStages,
    pub dst_access: AccessFlags,
}

/// Instance key of a render pass: everything that may vary between
/// format-compatible passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderPassOps {
    pub barrier: RenderPassBarrier,
    pub depth_ops: DepthOps,
    pub color_ops: [ColorOps; MAX_NUM_RENDER_TARGETS],
}

impl RenderPassOps {
    /// Ops that keep every attachment's contents and layout
    pub fn compatible(format: &RenderPassFormat) -> Self {
        let mut ops = Self::default();

        if format.has_depth() {
            ops.depth_ops = DepthOps {
                load_op_d: LoadOp::Load,
                load_op_s: LoadOp::Load,
                load_layout: format.depth.layout,
                store_layout: format.depth.layout,
            };
        }

        for (i, color) in format.color.iter().enumerate() {
            if color.format.is_defined() {
                ops.color_ops[i] = ColorOps {
                    load_op: LoadOp::Load,
                    load_layout: color.layout,
                    store_layout: color.layout,
                };
            }
        }

        ops
    }
}
