/// Render module - format-keyed render pass cache and the neutral types it is built from

pub mod format;
pub mod info;
pub mod ops;
pub mod pool;
pub mod render_pass;

pub use format::*;
pub use info::*;
pub use ops::*;
pub use pool::RenderPassPool;
pub use render_pass::RenderPass;
