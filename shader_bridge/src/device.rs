/// Backend object creation interfaces
///
/// The core never talks to a graphics API directly. Backends implement these
/// factories (e.g. `VulkanDevice`) and hand out plain copyable handles; the
/// core owns every handle it receives and gives it back exactly once.

use std::fmt;

use crate::error::Result;
use crate::render::RenderPassInfo;
use crate::shader::ShaderStage;
use crate::spirv::SpirvCodeBuffer;

/// Creates and destroys shader modules
pub trait ShaderModuleFactory: Send + Sync {
    /// Backend shader module handle
    type Module: Copy + Send + Sync + fmt::Debug + 'static;

    /// Create a shader module from specialized SPIR-V
    ///
    /// # Arguments
    ///
    /// * `stage` - Pipeline stage the module is built for
    /// * `code` - Complete SPIR-V module
    ///
    /// # Returns
    ///
    /// The new module handle, or the backend's error
    fn create_shader_module(&self, stage: ShaderStage, code: &SpirvCodeBuffer) -> Result<Self::Module>;

    /// Destroy a module previously returned by `create_shader_module`
    fn destroy_shader_module(&self, module: Self::Module);
}

/// Creates and destroys render pass objects
pub trait RenderPassFactory: Send + Sync {
    /// Backend render pass handle
    type RenderPass: Copy + PartialEq + Send + Sync + fmt::Debug + 'static;

    /// Create a render pass
    ///
    /// # Arguments
    ///
    /// * `info` - Attachments, references and dependencies of the pass
    ///
    /// # Returns
    ///
    /// The new render pass handle, or the backend's error
    fn create_render_pass(&self, info: &RenderPassInfo) -> Result<Self::RenderPass>;

    /// Destroy a render pass previously returned by `create_render_pass`
    fn destroy_render_pass(&self, render_pass: Self::RenderPass);
}
