/*!
# Shader Bridge

Backend-neutral core for turning translated shaders and render target
configurations into specialized GPU objects.

## Architecture

- **dxbc**: Decodes input/output signature chunks into `SignatureTable`s
- **spirv**: Scans SPIR-V templates once and produces specialized copies
  (binding remap, dual-source blend swap, undefined input elimination)
- **shader**: Shader objects, resource slot mapping and module creation
- **pool**: Fixed-size worker pool for asynchronous module creation
- **render**: Format-keyed render pass cache
- **device**: Factory traits implemented by backends (see `shader_bridge_vulkan`)

Every component that reports diagnostics receives a `Log` handle when it is
constructed; there is no global logger.
*/

// Internal modules
mod error;
pub mod config;
pub mod device;
pub mod dxbc;
pub mod log;
pub mod platform;
pub mod pool;
pub mod render;
pub mod shader;
pub mod spirv;

#[cfg(test)]
mod mock_device;

// Main bridge namespace module
pub mod bridge {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            DefaultLogger, FileLogger, Log, LogConfig, LogEntry, LogSeverity, LogTarget, Logger,
            MultiLogger,
        };
    }

    pub mod config {
        pub use crate::config::*;
    }

    pub mod platform {
        pub use crate::platform::{Platform, SystemPlatform, ThreadPriority};
    }

    // Backend factory traits
    pub mod device {
        pub use crate::device::{RenderPassFactory, ShaderModuleFactory};
    }

    pub mod dxbc {
        pub use crate::dxbc::*;
    }

    pub mod spirv {
        pub use crate::spirv::*;
    }

    pub mod shader {
        pub use crate::shader::*;
    }

    pub mod pool {
        pub use crate::pool::*;
    }

    pub mod render {
        pub use crate::render::*;
    }
}
