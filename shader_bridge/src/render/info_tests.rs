//! Unit tests for info.rs

use crate::render::*;

// ============================================================================
// HELPERS
// ============================================================================

fn color_depth_format(depth_layout: ImageLayout) -> RenderPassFormat {
    let mut format = RenderPassFormat::default();
    format.color[0] = AttachmentFormat::new(Format::R8G8B8A8_UNORM, ImageLayout::ColorAttachment);
    format.color[2] = AttachmentFormat::new(Format::R16G16B16A16_SFLOAT, ImageLayout::ColorAttachment);
    format.depth = AttachmentFormat::new(Format::D24_UNORM_S8_UINT, depth_layout);
    format
}

fn render_dependency(info: &RenderPassInfo) -> &SubpassDependency {
    info.dependencies
        .iter()
        .find(|d| d.src_subpass == SUBPASS_EXTERNAL)
        .expect("render dependency")
}

// ============================================================================
// ATTACHMENTS
// ============================================================================

#[test]
fn test_attachments_follow_slot_order() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let info = RenderPassInfo::build(&format, &RenderPassOps::compatible(&format));

    assert_eq!(info.attachments.len(), 3);
    assert_eq!(info.attachments[0].format, Format::R8G8B8A8_UNORM);
    assert_eq!(info.attachments[1].format, Format::R16G16B16A16_SFLOAT);
    assert_eq!(info.attachments[2].format, Format::D24_UNORM_S8_UINT);

    assert_eq!(info.color_refs[0].unwrap().attachment, 0);
    assert!(info.color_refs[1].is_none());
    assert_eq!(info.color_refs[2].unwrap().attachment, 1);
    assert_eq!(info.depth_ref.unwrap().attachment, 2);
    assert_eq!(info.color_attachment_count(), 2);
}

#[test]
fn test_color_attachment_ops() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let mut ops = RenderPassOps::compatible(&format);
    ops.color_ops[0] = ColorOps {
        load_op: LoadOp::Clear,
        load_layout: ImageLayout::Undefined,
        store_layout: ImageLayout::PresentSrc,
    };

    let info = RenderPassInfo::build(&format, &ops);
    let color = &info.attachments[0];
    assert_eq!(color.load_op, LoadOp::Clear);
    assert_eq!(color.store_op, StoreOp::Store);
    assert_eq!(color.stencil_load_op, LoadOp::DontCare);
    assert_eq!(color.stencil_store_op, StoreOp::DontCare);
    assert_eq!(color.initial_layout, ImageLayout::Undefined);
    assert_eq!(color.final_layout, ImageLayout::PresentSrc);
    // Reference layout comes from the format, not the ops
    assert_eq!(info.color_refs[0].unwrap().layout, ImageLayout::ColorAttachment);
}

#[test]
fn test_depth_attachment_ops() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let mut ops = RenderPassOps::compatible(&format);
    ops.depth_ops.load_op_d = LoadOp::Clear;
    ops.depth_ops.load_op_s = LoadOp::DontCare;

    let info = RenderPassInfo::build(&format, &ops);
    let depth = &info.attachments[2];
    assert_eq!(depth.load_op, LoadOp::Clear);
    assert_eq!(depth.stencil_load_op, LoadOp::DontCare);
    assert_eq!(depth.store_op, StoreOp::Store);
    assert_eq!(depth.stencil_store_op, StoreOp::Store);
}

#[test]
fn test_empty_format_has_no_dependencies() {
    let format = RenderPassFormat::default();
    let info = RenderPassInfo::build(&format, &RenderPassOps::default());
    assert!(info.attachments.is_empty());
    assert!(info.depth_ref.is_none());
    assert!(info.dependencies.is_empty());
}

// ============================================================================
// RENDER DEPENDENCY
// ============================================================================

#[test]
fn test_render_dependency_color_only() {
    let mut format = RenderPassFormat::default();
    format.color[0] = AttachmentFormat::new(Format::B8G8R8A8_SRGB, ImageLayout::ColorAttachment);

    let mut ops = RenderPassOps::compatible(&format);
    ops.color_ops[0].load_op = LoadOp::Clear;
    let info = RenderPassInfo::build(&format, &ops);

    let dep = render_dependency(&info);
    assert_eq!(dep.dst_subpass, 0);
    assert_eq!(dep.src_stages, PipelineStages::COLOR_ATTACHMENT_OUTPUT);
    assert_eq!(dep.dst_stages, PipelineStages::COLOR_ATTACHMENT_OUTPUT);
    assert!(dep.src_access.is_empty());
    assert_eq!(dep.dst_access, AccessFlags::COLOR_ATTACHMENT_WRITE);

    // Loading adds the read
    let info = RenderPassInfo::build(&format, &RenderPassOps::compatible(&format));
    assert!(render_dependency(&info)
        .dst_access
        .contains(AccessFlags::COLOR_ATTACHMENT_READ));
}

#[test]
fn test_render_dependency_depth_attachment_layout() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let info = RenderPassInfo::build(&format, &RenderPassOps::compatible(&format));
    let dep = render_dependency(&info);

    assert!(dep.dst_stages.contains(
        PipelineStages::EARLY_FRAGMENT_TESTS | PipelineStages::LATE_FRAGMENT_TESTS
    ));
    assert!(!dep.dst_stages.contains(PipelineStages::FRAGMENT_SHADER));
    assert!(dep.dst_access.contains(
        AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ | AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE
    ));
    assert!(!dep.dst_access.contains(AccessFlags::SHADER_READ));
}

#[test]
fn test_render_dependency_read_only_depth() {
    let format = color_depth_format(ImageLayout::DepthStencilReadOnly);
    let info = RenderPassInfo::build(&format, &RenderPassOps::compatible(&format));
    let dep = render_dependency(&info);

    assert!(!dep.dst_access.contains(AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE));
    // Not the attachment-optimal layout, so the depth may be sampled
    assert!(dep.dst_stages.contains(PipelineStages::FRAGMENT_SHADER));
    assert!(dep.dst_access.contains(AccessFlags::SHADER_READ));
}

#[test]
fn test_depth_read_only_when_loaded_aspect_exists() {
    let mut format = RenderPassFormat::default();
    format.depth = AttachmentFormat::new(Format::D32_FLOAT, ImageLayout::DepthStencilAttachment);

    // Only the stencil is loaded, and the format has no stencil
    let mut ops = RenderPassOps::compatible(&format);
    ops.depth_ops.load_op_d = LoadOp::Clear;
    ops.depth_ops.load_op_s = LoadOp::Load;
    let info = RenderPassInfo::build(&format, &ops);
    assert!(!render_dependency(&info)
        .dst_access
        .contains(AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ));

    // Depth loaded
    ops.depth_ops.load_op_d = LoadOp::Load;
    let info = RenderPassInfo::build(&format, &ops);
    assert!(render_dependency(&info)
        .dst_access
        .contains(AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ));
}

#[test]
fn test_depth_and_stencil_loads_are_combined() {
    let mut format = RenderPassFormat::default();
    format.depth = AttachmentFormat::new(Format::D32_FLOAT, ImageLayout::DepthStencilAttachment);

    let mut ops = RenderPassOps::compatible(&format);
    ops.depth_ops.load_op_d = LoadOp::Load;
    ops.depth_ops.load_op_s = LoadOp::Load;
    let info = RenderPassInfo::build(&format, &ops);
    assert!(render_dependency(&info)
        .dst_access
        .contains(AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ));
}

// ============================================================================
// BARRIER DEPENDENCIES
// ============================================================================

#[test]
fn test_transform_feedback_dependency() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let mut ops = RenderPassOps::compatible(&format);
    ops.barrier.src_stages = PipelineStages::TRANSFORM_FEEDBACK;

    let info = RenderPassInfo::build(&format, &ops);
    assert_eq!(info.dependencies.len(), 2);

    let xfb = &info.dependencies[1];
    assert_eq!((xfb.src_subpass, xfb.dst_subpass), (0, 0));
    assert_eq!(xfb.src_stages, PipelineStages::TRANSFORM_FEEDBACK);
    assert_eq!(xfb.dst_stages, PipelineStages::DRAW_INDIRECT);
    assert_eq!(xfb.src_access, AccessFlags::TRANSFORM_FEEDBACK_COUNTER_WRITE);
    assert_eq!(xfb.dst_access, AccessFlags::TRANSFORM_FEEDBACK_COUNTER_READ);
}

#[test]
fn test_fragment_shader_self_dependency() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let mut ops = RenderPassOps::compatible(&format);
    ops.barrier.src_stages = PipelineStages::FRAGMENT_SHADER;

    let info = RenderPassInfo::build(&format, &ops);
    assert_eq!(info.dependencies.len(), 2);

    let dep = &info.dependencies[1];
    assert_eq!(dep.src_stages, PipelineStages::COLOR_ATTACHMENT_OUTPUT);
    assert_eq!(dep.dst_stages, PipelineStages::FRAGMENT_SHADER);
    assert_eq!(dep.flags, DependencyFlags::BY_REGION);
}

#[test]
fn test_all_commands_barrier_emits_four_dependencies() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let mut ops = RenderPassOps::compatible(&format);
    ops.barrier = RenderPassBarrier {
        src_stages: PipelineStages::ALL_COMMANDS,
        src_access: AccessFlags::MEMORY_WRITE,
        dst_stages: PipelineStages::ALL_COMMANDS,
        dst_access: AccessFlags::MEMORY_READ,
    };

    let info = RenderPassInfo::build(&format, &ops);
    assert_eq!(info.dependencies.len(), MAX_NUM_DEPENDENCIES);

    let external = &info.dependencies[3];
    assert_eq!(external.src_subpass, 0);
    assert_eq!(external.dst_subpass, SUBPASS_EXTERNAL);
    assert_eq!(external.src_access, AccessFlags::MEMORY_WRITE);
    assert_eq!(external.dst_access, AccessFlags::MEMORY_READ);
}

#[test]
fn test_barrier_without_dst_stages_is_dropped() {
    let format = color_depth_format(ImageLayout::DepthStencilAttachment);
    let mut ops = RenderPassOps::compatible(&format);
    ops.barrier.src_stages = PipelineStages::TRANSFER;

    let info = RenderPassInfo::build(&format, &ops);
    assert_eq!(info.dependencies.len(), 1);
}

// ============================================================================
// FORMAT HELPERS
// ============================================================================

#[test]
fn test_format_aspects() {
    assert_eq!(Format::R8G8B8A8_UNORM.aspect_mask(), ImageAspectFlags::COLOR);
    assert_eq!(Format::D32_FLOAT.aspect_mask(), ImageAspectFlags::DEPTH);
    assert_eq!(Format::S8_UINT.aspect_mask(), ImageAspectFlags::STENCIL);
    assert_eq!(
        Format::D24_UNORM_S8_UINT.aspect_mask(),
        ImageAspectFlags::DEPTH | ImageAspectFlags::STENCIL
    );
    assert!(Format::UNDEFINED.aspect_mask().is_empty());
    assert!(Format::D16_UNORM.is_depth_stencil());
    assert!(!Format::R32_UINT.is_depth_stencil());
}

#[test]
fn test_compatible_ops_keep_layouts() {
    let format = color_depth_format(ImageLayout::DepthStencilReadOnly);
    let ops = RenderPassOps::compatible(&format);

    assert_eq!(ops.color_ops[0].load_op, LoadOp::Load);
    assert_eq!(ops.color_ops[0].load_layout, ImageLayout::ColorAttachment);
    assert_eq!(ops.color_ops[0].store_layout, ImageLayout::ColorAttachment);
    assert_eq!(ops.depth_ops.load_layout, ImageLayout::DepthStencilReadOnly);
    assert_eq!(ops.color_ops[1], ColorOps::default());
    assert_eq!(ops.barrier, RenderPassBarrier::default());
}
