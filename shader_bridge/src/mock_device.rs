/// Mock device for unit tests (no GPU required)
///
/// Implements both factories with plain integer handles and counts every
/// creation and destruction so tests can check cache behavior.

#[cfg(test)]
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use crate::device::{RenderPassFactory, ShaderModuleFactory};
#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::render::RenderPassInfo;
#[cfg(test)]
use crate::shader::ShaderStage;
#[cfg(test)]
use crate::spirv::SpirvCodeBuffer;

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockHandle(pub u64);

#[cfg(test)]
#[derive(Default)]
pub struct MockDevice {
    next_handle: AtomicU64,
    pub render_passes_created: AtomicUsize,
    pub render_passes_destroyed: AtomicUsize,
    pub modules_created: AtomicUsize,
    pub modules_destroyed: AtomicUsize,
    /// When set, render pass creation fails
    pub fail_render_passes: AtomicBool,
    /// Every info passed to `create_render_pass`, in call order
    pub render_pass_infos: Mutex<Vec<RenderPassInfo>>,
    /// Code of every created module, in call order
    pub module_code: Mutex<Vec<(ShaderStage, SpirvCodeBuffer)>>,
}

#[cfg(test)]
impl MockDevice {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            ..Default::default()
        }
    }

    fn handle(&self) -> MockHandle {
        MockHandle(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }

    pub fn live_render_passes(&self) -> usize {
        self.render_passes_created.load(Ordering::SeqCst)
            - self.render_passes_destroyed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl RenderPassFactory for MockDevice {
    type RenderPass = MockHandle;

    fn create_render_pass(&self, info: &RenderPassInfo) -> Result<MockHandle> {
        if self.fail_render_passes.load(Ordering::SeqCst) {
            return Err(Error::BackendError("mock render pass creation failed".to_string()));
        }
        self.render_pass_infos.lock().unwrap().push(info.clone());
        self.render_passes_created.fetch_add(1, Ordering::SeqCst);
        Ok(self.handle())
    }

    fn destroy_render_pass(&self, _render_pass: MockHandle) {
        self.render_passes_destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl ShaderModuleFactory for MockDevice {
    type Module = MockHandle;

    fn create_shader_module(&self, stage: ShaderStage, code: &SpirvCodeBuffer) -> Result<MockHandle> {
        self.module_code.lock().unwrap().push((stage, code.clone()));
        self.modules_created.fetch_add(1, Ordering::SeqCst);
        Ok(self.handle())
    }

    fn destroy_shader_module(&self, _module: MockHandle) {
        self.modules_destroyed.fetch_add(1, Ordering::SeqCst);
    }
}
