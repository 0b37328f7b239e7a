/// VulkanDevice - object creation on an existing logical device

use ash::vk;
use shader_bridge::bridge::device::{RenderPassFactory, ShaderModuleFactory};
use shader_bridge::bridge::log::Log;
use shader_bridge::bridge::render::RenderPassInfo;
use shader_bridge::bridge::shader::ShaderStage;
use shader_bridge::bridge::spirv::SpirvCodeBuffer;
use shader_bridge::bridge::{Error, Result};
use shader_bridge::bridge_debug;

use crate::vulkan_render_pass::VulkanRenderPassDesc;

const SOURCE: &str = "bridge::vulkan";

/// Creates shader modules and render passes on a borrowed `ash::Device`
///
/// The device is not destroyed on drop; the owner must keep it alive
/// longer than every object created through it.
pub struct VulkanDevice {
    device: ash::Device,
    log: Log,
}

impl VulkanDevice {
    pub fn new(device: ash::Device, log: Log) -> Self {
        Self { device, log }
    }

    pub fn device(&self) -> &ash::Device {
        &self.device
    }
}

/// Error for a failed `vkCreate*` call
///
/// Not logged here: the core reports creation failures where it receives them.
fn vk_error(result: vk::Result, what: &str) -> Error {
    match result {
        vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => Error::OutOfMemory,
        _ => Error::BackendError(format!("Failed to create {}: {:?}", what, result)),
    }
}

impl ShaderModuleFactory for VulkanDevice {
    type Module = vk::ShaderModule;

    fn create_shader_module(&self, stage: ShaderStage, code: &SpirvCodeBuffer) -> Result<vk::ShaderModule> {
        let create_info = vk::ShaderModuleCreateInfo::default().code(code.words());

        let module = unsafe { self.device.create_shader_module(&create_info, None) }
            .map_err(|e| vk_error(e, "shader module"))?;

        bridge_debug!(self.log, SOURCE, "Created {} shader module {:?} ({} bytes)",
            stage.name(), module, code.size());
        Ok(module)
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        unsafe {
            self.device.destroy_shader_module(module, None);
        }
    }
}

impl RenderPassFactory for VulkanDevice {
    type RenderPass = vk::RenderPass;

    fn create_render_pass(&self, info: &RenderPassInfo) -> Result<vk::RenderPass> {
        let desc = VulkanRenderPassDesc::from_info(info);

        let render_pass = unsafe { desc.create(&self.device) }
            .map_err(|e| vk_error(e, "render pass"))?;

        bridge_debug!(self.log, SOURCE, "Created render pass {:?} with {} attachments",
            render_pass, desc.attachments.len());
        Ok(render_pass)
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        unsafe {
            self.device.destroy_render_pass(render_pass, None);
        }
    }
}
