/// Shader object
///
/// Owns an immutable SPIR-V template together with the patch markers found
/// in it. Specialized copies are produced per pipeline and turned into
/// backend modules, synchronously or on the compiler pool.

use std::io::{self, Write};
use std::sync::Arc;

use crate::device::ShaderModuleFactory;
use crate::error::Result;
use crate::log::Log;
use crate::pool::{TaskHandle, ThreadPool};
use crate::shader::interface::InterfaceSlots;
use crate::shader::slots::{DescriptorSlotMapping, ResourceSlot};
use crate::shader::stage::ShaderStage;
use crate::spirv::{self, BindingMap, ShaderAnnotations, ShaderFlags, SpecializationParams, SpirvCodeBuffer};
use crate::{bridge_debug, bridge_error};

/// Per-pipeline options applied when creating a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderModuleCreateInfo {
    /// Route output 1 to the second blend source of output 0
    pub fs_dual_src_blend: bool,
    /// Input locations the previous stage never writes
    pub undefined_inputs: u32,
}

impl From<ShaderModuleCreateInfo> for SpecializationParams {
    fn from(info: ShaderModuleCreateInfo) -> Self {
        SpecializationParams {
            dual_src_blend: info.fs_dual_src_blend,
            undefined_inputs: info.undefined_inputs,
        }
    }
}

pub struct Shader {
    stage: ShaderStage,
    slots: Vec<ResourceSlot>,
    interface: InterfaceSlots,
    code: SpirvCodeBuffer,
    annotations: ShaderAnnotations,
    const_data: Vec<u32>,
    log: Log,
}

impl Shader {
    /// Create a shader and scan its code for patchable operands
    ///
    /// # Arguments
    ///
    /// * `stage` - Pipeline stage
    /// * `slots` - Resource slots the code refers to
    /// * `interface` - Input/output registers and push constant block
    /// * `code` - SPIR-V template, never modified afterwards
    /// * `const_data` - Immediate constant buffer contents
    /// * `log` - Sink for module creation diagnostics
    pub fn new(
        stage: ShaderStage,
        slots: Vec<ResourceSlot>,
        interface: InterfaceSlots,
        code: SpirvCodeBuffer,
        const_data: Vec<u32>,
        log: Log,
    ) -> Self {
        let annotations = ShaderAnnotations::scan(&code);
        Self {
            stage,
            slots,
            interface,
            code,
            annotations,
            const_data,
            log,
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn slots(&self) -> &[ResourceSlot] {
        &self.slots
    }

    pub fn interface(&self) -> &InterfaceSlots {
        &self.interface
    }

    pub fn code(&self) -> &SpirvCodeBuffer {
        &self.code
    }

    pub fn annotations(&self) -> &ShaderAnnotations {
        &self.annotations
    }

    pub fn flags(&self) -> ShaderFlags {
        self.annotations.flags()
    }

    /// Immediate constant buffer words
    pub fn shader_constants(&self) -> &[u32] {
        &self.const_data
    }

    /// Register this shader's slots and push constant block in `mapping`
    pub fn define_resource_slots(&self, mapping: &mut DescriptorSlotMapping) {
        for slot in &self.slots {
            mapping.define_slot(self.stage, slot);
        }

        if self.interface.push_const_size != 0 {
            mapping.define_push_const_range(
                self.stage,
                self.interface.push_const_offset,
                self.interface.push_const_size,
            );
        }
    }

    /// Specialized copy of the template
    pub fn specialize(&self, mapping: &dyn BindingMap, info: ShaderModuleCreateInfo) -> Result<SpirvCodeBuffer> {
        spirv::specialize(&self.code, &self.annotations, mapping, info.into())
    }

    /// Specialize and hand the result to `device`
    ///
    /// # Returns
    ///
    /// An owning module that destroys its handle when dropped
    pub fn create_shader_module<D: ShaderModuleFactory>(
        &self,
        device: &Arc<D>,
        mapping: &DescriptorSlotMapping,
        info: ShaderModuleCreateInfo,
    ) -> Result<ShaderModule<D>> {
        let code = self.specialize(mapping, info).map_err(|e| {
            bridge_error!(
                self.log,
                "bridge::shader",
                "Failed to specialize {} shader: {}",
                self.stage.name(),
                e
            );
            e
        })?;

        let handle = device.create_shader_module(self.stage, &code).map_err(|e| {
            bridge_error!(
                self.log,
                "bridge::shader",
                "Failed to create {} shader module: {}",
                self.stage.name(),
                e
            );
            e
        })?;

        bridge_debug!(
            self.log,
            "bridge::shader",
            "Created {} shader module ({} words, {:?})",
            self.stage.name(),
            code.len(),
            info
        );

        Ok(ShaderModule {
            device: Arc::clone(device),
            stage: self.stage,
            handle,
        })
    }

    /// `create_shader_module` on a compiler pool worker
    ///
    /// # Errors
    ///
    /// Returns `PoolStopped` if the pool no longer accepts work. Errors of
    /// the creation itself are delivered through the handle.
    pub fn create_shader_module_async<D>(
        self: &Arc<Self>,
        pool: &ThreadPool,
        device: &Arc<D>,
        mapping: Arc<DescriptorSlotMapping>,
        info: ShaderModuleCreateInfo,
    ) -> Result<TaskHandle<Result<ShaderModule<D>>>>
    where
        D: ShaderModuleFactory + 'static,
    {
        let shader = Arc::clone(self);
        let device = Arc::clone(device);
        pool.submit(move || shader.create_shader_module(&device, &mapping, info))
    }

    /// Write the unspecialized template
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.code.store(writer)
    }
}

/// Backend shader module owned by its creator
pub struct ShaderModule<D: ShaderModuleFactory> {
    device: Arc<D>,
    stage: ShaderStage,
    handle: D::Module,
}

impl<D: ShaderModuleFactory> ShaderModule<D> {
    pub fn handle(&self) -> D::Module {
        self.handle
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<D: ShaderModuleFactory> Drop for ShaderModule<D> {
    fn drop(&mut self) {
        self.device.destroy_shader_module(self.handle);
    }
}

impl<D: ShaderModuleFactory> std::fmt::Debug for ShaderModule<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderModule")
            .field("stage", &self.stage)
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
