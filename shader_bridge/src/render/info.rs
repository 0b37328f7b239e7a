/// RenderPassInfo - backend-neutral description of a single-subpass render pass

use crate::render::format::{Format, ImageLayout, RenderPassFormat, SampleCount, MAX_NUM_RENDER_TARGETS};
use crate::render::ops::{
    AccessFlags, DependencyFlags, ImageAspectFlags, LoadOp, PipelineStages, RenderPassOps, StoreOp,
};

/// Subpass index standing for "outside the render pass"
pub const SUBPASS_EXTERNAL: u32 = !0;

/// Upper bound on the dependencies `RenderPassInfo::build` emits
pub const MAX_NUM_DEPENDENCIES: usize = 4;

/// One attachment of the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentDescription {
    pub format: Format,
    pub samples: SampleCount,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
    pub stencil_load_op: LoadOp,
    pub stencil_store_op: StoreOp,
    pub initial_layout: ImageLayout,
    pub final_layout: ImageLayout,
}

/// Reference from the subpass to an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentReference {
    /// Index into `RenderPassInfo::attachments`
    pub attachment: u32,
    /// Layout during the subpass
    pub layout: ImageLayout,
}

/// Execution and memory dependency between subpasses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubpassDependency {
    pub src_subpass: u32,
    pub dst_subpass: u32,
    pub src_stages: PipelineStages,
    pub dst_stages: PipelineStages,
    pub src_access: AccessFlags,
    pub dst_access: AccessFlags,
    pub flags: DependencyFlags,
}

/// Description of a render pass with one graphics subpass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPassInfo {
    /// Bound attachments; colors in slot order, then depth
    pub attachments: Vec<AttachmentDescription>,
    /// One entry per color slot, `None` for unused slots
    pub color_refs: [Option<AttachmentReference>; MAX_NUM_RENDER_TARGETS],
    pub depth_ref: Option<AttachmentReference>,
    /// At most `MAX_NUM_DEPENDENCIES` entries
    pub dependencies: Vec<SubpassDependency>,
}

impl RenderPassInfo {
    /// Derive attachments, references and dependencies for `format` under `ops`
    pub fn build(format: &RenderPassFormat, ops: &RenderPassOps) -> Self {
        let mut attachments = Vec::with_capacity(MAX_NUM_RENDER_TARGETS + 1);
        let mut color_refs = [None; MAX_NUM_RENDER_TARGETS];

        for (i, color) in format.color.iter().enumerate() {
            if !color.format.is_defined() {
                continue;
            }

            let color_ops = &ops.color_ops[i];
            color_refs[i] = Some(AttachmentReference {
                attachment: attachments.len() as u32,
                layout: color.layout,
            });
            attachments.push(AttachmentDescription {
                format: color.format,
                samples: format.sample_count,
                load_op: color_ops.load_op,
                store_op: StoreOp::Store,
                stencil_load_op: LoadOp::DontCare,
                stencil_store_op: StoreOp::DontCare,
                initial_layout: color_ops.load_layout,
                final_layout: color_ops.store_layout,
            });
        }

        let mut depth_ref = None;
        if format.has_depth() {
            let depth_ops = &ops.depth_ops;
            depth_ref = Some(AttachmentReference {
                attachment: attachments.len() as u32,
                layout: format.depth.layout,
            });
            attachments.push(AttachmentDescription {
                format: format.depth.format,
                samples: format.sample_count,
                load_op: depth_ops.load_op_d,
                store_op: StoreOp::Store,
                stencil_load_op: depth_ops.load_op_s,
                stencil_store_op: StoreOp::Store,
                initial_layout: depth_ops.load_layout,
                final_layout: depth_ops.store_layout,
            });
        }

        Self {
            attachments,
            color_refs,
            depth_ref,
            dependencies: Self::dependencies(format, ops),
        }
    }

    fn dependencies(format: &RenderPassFormat, ops: &RenderPassOps) -> Vec<SubpassDependency> {
        let mut deps = Vec::with_capacity(MAX_NUM_DEPENDENCIES);

        let mut render_stages = PipelineStages::empty();
        let mut render_access = AccessFlags::empty();

        if format.has_depth() {
            render_stages |= PipelineStages::EARLY_FRAGMENT_TESTS | PipelineStages::LATE_FRAGMENT_TESTS;

            let mut load_aspects = ImageAspectFlags::empty();
            if ops.depth_ops.load_op_d == LoadOp::Load {
                load_aspects |= ImageAspectFlags::DEPTH;
            }
            if ops.depth_ops.load_op_s == LoadOp::Load {
                load_aspects |= ImageAspectFlags::STENCIL;
            }

            if load_aspects.intersects(format.depth.format.aspect_mask()) {
                render_access |= AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ;
            }

            if format.depth.layout != ImageLayout::DepthStencilReadOnly {
                render_access |= AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;
            }

            // Depth sampled in the same pass
            if format.depth.layout != ImageLayout::DepthStencilAttachment {
                render_stages |= PipelineStages::FRAGMENT_SHADER;
                render_access |= AccessFlags::SHADER_READ;
            }
        }

        for (i, color) in format.color.iter().enumerate() {
            if !color.format.is_defined() {
                continue;
            }

            render_stages |= PipelineStages::COLOR_ATTACHMENT_OUTPUT;
            render_access |= AccessFlags::COLOR_ATTACHMENT_WRITE;

            if ops.color_ops[i].load_op == LoadOp::Load {
                render_access |= AccessFlags::COLOR_ATTACHMENT_READ;
            }
        }

        if !render_stages.is_empty() {
            deps.push(SubpassDependency {
                src_subpass: SUBPASS_EXTERNAL,
                dst_subpass: 0,
                src_stages: render_stages,
                dst_stages: render_stages,
                src_access: AccessFlags::empty(),
                dst_access: render_access,
                flags: DependencyFlags::empty(),
            });
        }

        let src = ops.barrier.src_stages;

        if src.intersects(
            PipelineStages::TRANSFORM_FEEDBACK | PipelineStages::ALL_GRAPHICS | PipelineStages::ALL_COMMANDS,
        ) {
            deps.push(SubpassDependency {
                src_subpass: 0,
                dst_subpass: 0,
                src_stages: PipelineStages::TRANSFORM_FEEDBACK,
                dst_stages: PipelineStages::DRAW_INDIRECT,
                src_access: AccessFlags::TRANSFORM_FEEDBACK_COUNTER_WRITE,
                dst_access: AccessFlags::TRANSFORM_FEEDBACK_COUNTER_READ,
                flags: DependencyFlags::empty(),
            });
        }

        if src.intersects(
            PipelineStages::FRAGMENT_SHADER | PipelineStages::ALL_GRAPHICS | PipelineStages::ALL_COMMANDS,
        ) {
            deps.push(SubpassDependency {
                src_subpass: 0,
                dst_subpass: 0,
                src_stages: PipelineStages::COLOR_ATTACHMENT_OUTPUT,
                dst_stages: PipelineStages::FRAGMENT_SHADER,
                src_access: AccessFlags::COLOR_ATTACHMENT_WRITE,
                dst_access: AccessFlags::SHADER_READ,
                flags: DependencyFlags::BY_REGION,
            });
        }

        if !src.is_empty() && !ops.barrier.dst_stages.is_empty() {
            deps.push(SubpassDependency {
                src_subpass: 0,
                dst_subpass: SUBPASS_EXTERNAL,
                src_stages: src,
                dst_stages: ops.barrier.dst_stages,
                src_access: ops.barrier.src_access,
                dst_access: ops.barrier.dst_access,
                flags: DependencyFlags::empty(),
            });
        }

        deps
    }

    /// Number of color slots with an attachment
    pub fn color_attachment_count(&self) -> usize {
        self.color_refs.iter().filter(|r| r.is_some()).count()
    }
}

#[cfg(test)]
#[path = "info_tests.rs"]
mod tests;
