/// RenderPassPool - one `RenderPass` per distinct format

use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;

use crate::bridge_trace;
use crate::device::RenderPassFactory;
use crate::error::Result;
use crate::log::Log;
use crate::render::format::RenderPassFormat;
use crate::render::render_pass::RenderPass;

/// Format-keyed cache of render pass objects
///
/// Entries are never evicted; the handful of formats a program uses bounds
/// the growth.
pub struct RenderPassPool<F: RenderPassFactory> {
    factory: Arc<F>,
    render_passes: Mutex<FxHashMap<RenderPassFormat, Arc<RenderPass<F>>>>,
    log: Log,
}

impl<F: RenderPassFactory> RenderPassPool<F> {
    pub fn new(factory: Arc<F>, log: Log) -> Self {
        Self {
            factory,
            render_passes: Mutex::new(FxHashMap::default()),
            log,
        }
    }

    /// Render pass object for `format`, created on first request
    ///
    /// # Errors
    ///
    /// Returns the factory's error if the default pass of a new format cannot
    /// be created.
    pub fn get(&self, format: &RenderPassFormat) -> Result<Arc<RenderPass<F>>> {
        let mut render_passes = self.render_passes.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(render_pass) = render_passes.get(format) {
            return Ok(Arc::clone(render_pass));
        }

        let render_pass = Arc::new(RenderPass::new(
            Arc::clone(&self.factory),
            *format,
            self.log.clone(),
        )?);
        render_passes.insert(*format, Arc::clone(&render_pass));

        bridge_trace!(
            self.log,
            "bridge::render",
            "Render pass pool now holds {} format(s)",
            render_passes.len()
        );

        Ok(render_pass)
    }

    /// Number of distinct formats seen so far
    pub fn len(&self) -> usize {
        self.render_passes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
