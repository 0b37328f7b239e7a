/// Vulkan form of a neutral `RenderPassInfo`
///
/// Owns every array the create info points into, so the create info can be
/// assembled right before the call without dangling pointers.

use ash::prelude::VkResult;
use ash::vk;
use shader_bridge::bridge::render::{RenderPassInfo, MAX_NUM_RENDER_TARGETS, SUBPASS_EXTERNAL};

use crate::vulkan_format::{
    access_flags_to_vk, dependency_flags_to_vk, format_to_vk, image_layout_to_vk, load_op_to_vk,
    pipeline_stages_to_vk, sample_count_to_vk, store_op_to_vk,
};

#[derive(Debug, Clone)]
pub struct VulkanRenderPassDesc {
    pub attachments: Vec<vk::AttachmentDescription>,
    /// Every color slot; unused slots reference `vk::ATTACHMENT_UNUSED`
    pub color_refs: [vk::AttachmentReference; MAX_NUM_RENDER_TARGETS],
    pub depth_ref: Option<vk::AttachmentReference>,
    pub dependencies: Vec<vk::SubpassDependency>,
}

impl VulkanRenderPassDesc {
    pub fn from_info(info: &RenderPassInfo) -> Self {
        let attachments = info
            .attachments
            .iter()
            .map(|a| {
                vk::AttachmentDescription::default()
                    .format(format_to_vk(a.format))
                    .samples(sample_count_to_vk(a.samples))
                    .load_op(load_op_to_vk(a.load_op))
                    .store_op(store_op_to_vk(a.store_op))
                    .stencil_load_op(load_op_to_vk(a.stencil_load_op))
                    .stencil_store_op(store_op_to_vk(a.stencil_store_op))
                    .initial_layout(image_layout_to_vk(a.initial_layout))
                    .final_layout(image_layout_to_vk(a.final_layout))
            })
            .collect();

        let mut color_refs = [vk::AttachmentReference::default()
            .attachment(vk::ATTACHMENT_UNUSED)
            .layout(vk::ImageLayout::UNDEFINED); MAX_NUM_RENDER_TARGETS];

        for (slot, reference) in info.color_refs.iter().enumerate() {
            if let Some(reference) = reference {
                color_refs[slot] = vk::AttachmentReference::default()
                    .attachment(reference.attachment)
                    .layout(image_layout_to_vk(reference.layout));
            }
        }

        let depth_ref = info.depth_ref.map(|reference| {
            vk::AttachmentReference::default()
                .attachment(reference.attachment)
                .layout(image_layout_to_vk(reference.layout))
        });

        let dependencies = info
            .dependencies
            .iter()
            .map(|d| {
                vk::SubpassDependency::default()
                    .src_subpass(subpass_to_vk(d.src_subpass))
                    .dst_subpass(subpass_to_vk(d.dst_subpass))
                    .src_stage_mask(pipeline_stages_to_vk(d.src_stages))
                    .dst_stage_mask(pipeline_stages_to_vk(d.dst_stages))
                    .src_access_mask(access_flags_to_vk(d.src_access))
                    .dst_access_mask(access_flags_to_vk(d.dst_access))
                    .dependency_flags(dependency_flags_to_vk(d.flags))
            })
            .collect();

        Self {
            attachments,
            color_refs,
            depth_ref,
            dependencies,
        }
    }

    /// Color references up to the last bound slot
    pub fn used_color_refs(&self) -> &[vk::AttachmentReference] {
        let count = self
            .color_refs
            .iter()
            .rposition(|r| r.attachment != vk::ATTACHMENT_UNUSED)
            .map_or(0, |last| last + 1);
        &self.color_refs[..count]
    }

    /// Create the render pass on `device`
    ///
    /// # Safety
    ///
    /// `device` must be a valid, live logical device.
    pub unsafe fn create(&self, device: &ash::Device) -> VkResult<vk::RenderPass> {
        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(self.used_color_refs());

        if let Some(ref depth_ref) = self.depth_ref {
            subpass = subpass.depth_stencil_attachment(depth_ref);
        }

        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&self.attachments)
            .subpasses(std::slice::from_ref(&subpass))
            .dependencies(&self.dependencies);

        device.create_render_pass(&create_info, None)
    }
}

fn subpass_to_vk(subpass: u32) -> u32 {
    if subpass == SUBPASS_EXTERNAL {
        vk::SUBPASS_EXTERNAL
    } else {
        subpass
    }
}

#[cfg(test)]
#[path = "vulkan_render_pass_tests.rs"]
mod tests;
