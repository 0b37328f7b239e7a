/// Pipeline stage description for modules created by `VulkanDevice`

use std::ffi::CStr;

use ash::vk;
use shader_bridge::bridge::shader::ShaderStage;

use crate::vulkan_format::shader_stage_to_vk;

/// Entry point every bridged module exports
pub const ENTRY_POINT: &CStr = c"main";

/// Build the stage create info for `module`
pub fn shader_stage_create_info(
    module: vk::ShaderModule,
    stage: ShaderStage,
) -> vk::PipelineShaderStageCreateInfo<'static> {
    vk::PipelineShaderStageCreateInfo::default()
        .stage(shader_stage_to_vk(stage))
        .module(module)
        .name(ENTRY_POINT)
}
