/// RenderPass - per-format render pass with lazily created instances
///
/// Every pass created for one `RenderPassFormat` is compatible with the
/// others; they differ only in load ops, layout transitions and barriers.
/// The default instance is created eagerly and used for pipeline creation.

use std::sync::{Arc, Mutex, PoisonError};

use crate::device::RenderPassFactory;
use crate::error::Result;
use crate::log::Log;
use crate::render::format::RenderPassFormat;
use crate::render::info::RenderPassInfo;
use crate::render::ops::RenderPassOps;
use crate::{bridge_debug, bridge_error};

struct Instance<H> {
    ops: RenderPassOps,
    handle: H,
}

/// Render pass object for one format
pub struct RenderPass<F: RenderPassFactory> {
    factory: Arc<F>,
    format: RenderPassFormat,
    default_ops: RenderPassOps,
    default_handle: F::RenderPass,
    instances: Mutex<Vec<Instance<F::RenderPass>>>,
    log: Log,
}

impl<F: RenderPassFactory> RenderPass<F> {
    /// Create the per-format object and its default pass
    ///
    /// # Errors
    ///
    /// Returns the factory's error if the default pass cannot be created.
    pub fn new(factory: Arc<F>, format: RenderPassFormat, log: Log) -> Result<Self> {
        let default_ops = RenderPassOps::compatible(&format);
        let default_handle = create_render_pass(&*factory, &format, &default_ops, &log)?;

        Ok(Self {
            factory,
            format,
            default_ops,
            default_handle,
            instances: Mutex::new(Vec::new()),
            log,
        })
    }

    pub fn format(&self) -> &RenderPassFormat {
        &self.format
    }

    /// Whether `format` matches the format this object was created for
    pub fn has_compatible_format(&self, format: &RenderPassFormat) -> bool {
        self.format == *format
    }

    /// Pass created with `RenderPassOps::compatible`
    pub fn default_handle(&self) -> F::RenderPass {
        self.default_handle
    }

    pub fn default_ops(&self) -> &RenderPassOps {
        &self.default_ops
    }

    /// Pass for `ops`, created on first request
    ///
    /// # Errors
    ///
    /// Returns the factory's error if creation fails. Nothing is cached in that
    /// case, so a later call retries.
    pub fn get_handle(&self, ops: &RenderPassOps) -> Result<F::RenderPass> {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(instance) = instances.iter().find(|i| i.ops == *ops) {
            return Ok(instance.handle);
        }

        let handle = create_render_pass(&*self.factory, &self.format, ops, &self.log)?;
        instances.push(Instance { ops: *ops, handle });

        bridge_debug!(
            self.log,
            "bridge::render",
            "Created render pass instance {} for {} color attachment(s)",
            instances.len(),
            self.format.color_count()
        );

        Ok(handle)
    }

    /// Number of lazily created instances (the default pass not included)
    pub fn instance_count(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<F: RenderPassFactory> Drop for RenderPass<F> {
    fn drop(&mut self) {
        self.factory.destroy_render_pass(self.default_handle);

        let instances = self.instances.get_mut().unwrap_or_else(PoisonError::into_inner);
        for instance in instances.drain(..) {
            self.factory.destroy_render_pass(instance.handle);
        }
    }
}

fn create_render_pass<F: RenderPassFactory>(
    factory: &F,
    format: &RenderPassFormat,
    ops: &RenderPassOps,
    log: &Log,
) -> Result<F::RenderPass> {
    let info = RenderPassInfo::build(format, ops);

    factory.create_render_pass(&info).map_err(|e| {
        bridge_error!(log, "bridge::render", "Failed to create render pass object: {}", e);
        e
    })
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;
