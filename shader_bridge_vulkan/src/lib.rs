/*!
# Shader Bridge - Vulkan Backend

Vulkan implementation of the `shader_bridge` creation interfaces, built on `ash`.

`VulkanDevice` wraps an existing logical device and creates the shader modules
and render passes requested by the core. The conversion functions turn the
neutral render pass and shader descriptions into `vk::*` structures and can be
used without a device.

```no_run
use std::sync::Arc;
use shader_bridge::bridge::log::Log;
use shader_bridge::bridge::render::RenderPassPool;
use shader_bridge_vulkan::bridge::VulkanDevice;

# fn run(device: ash::Device) {
let log = Log::disabled();
let vulkan = Arc::new(VulkanDevice::new(device, log.clone()));
let render_passes = RenderPassPool::new(vulkan, log);
# }
```
*/

mod vulkan_device;
mod vulkan_format;
mod vulkan_render_pass;
mod vulkan_shader;

pub mod bridge {
    pub use crate::vulkan_device::VulkanDevice;
    pub use crate::vulkan_format::{
        access_flags_to_vk, dependency_flags_to_vk, descriptor_type_to_vk, format_to_vk,
        image_layout_to_vk, image_view_type_to_vk, load_op_to_vk, pipeline_stages_to_vk,
        sample_count_to_vk, shader_stage_flags_to_vk, shader_stage_to_vk, store_op_to_vk,
    };
    pub use crate::vulkan_render_pass::VulkanRenderPassDesc;
    pub use crate::vulkan_shader::{shader_stage_create_info, ENTRY_POINT};
}
