/// Attachment formats, layouts and the render pass format key

use crate::render::ops::ImageAspectFlags;

/// Maximum number of color attachments in one render pass
pub const MAX_NUM_RENDER_TARGETS: usize = 8;

/// Attachment format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum Format {
    /// No attachment bound to this slot
    #[default]
    UNDEFINED,

    // Color formats
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,
    A2B10G10R10_UNORM,
    B10G11R11_UFLOAT,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_UINT,

    // Depth/stencil formats
    D16_UNORM,
    D32_FLOAT,
    S8_UINT,
    D24_UNORM_S8_UINT,
    D32_FLOAT_S8_UINT,
}

impl Format {
    /// Image aspects present in this format
    pub fn aspect_mask(self) -> ImageAspectFlags {
        match self {
            Format::UNDEFINED => ImageAspectFlags::empty(),
            Format::D16_UNORM | Format::D32_FLOAT => ImageAspectFlags::DEPTH,
            Format::S8_UINT => ImageAspectFlags::STENCIL,
            Format::D24_UNORM_S8_UINT | Format::D32_FLOAT_S8_UINT => {
                ImageAspectFlags::DEPTH | ImageAspectFlags::STENCIL
            }
            _ => ImageAspectFlags::COLOR,
        }
    }

    pub fn is_defined(self) -> bool {
        self != Format::UNDEFINED
    }

    pub fn is_depth_stencil(self) -> bool {
        self.aspect_mask()
            .intersects(ImageAspectFlags::DEPTH | ImageAspectFlags::STENCIL)
    }
}

/// Image layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageLayout {
    /// Undefined layout (contents may be discarded)
    #[default]
    Undefined,
    /// Usable for any access
    General,
    /// Layout for color attachment
    ColorAttachment,
    /// Layout for depth/stencil attachment
    DepthStencilAttachment,
    /// Depth/stencil attachment that is only read
    DepthStencilReadOnly,
    /// Layout for shader read-only access
    ShaderReadOnly,
    /// Layout for transfer source
    TransferSrc,
    /// Layout for transfer destination
    TransferDst,
    /// Layout for presenting to swapchain
    PresentSrc,
}

/// Sample count of every attachment in a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleCount {
    #[default]
    S1,
    S2,
    S4,
    S8,
    S16,
    S32,
    S64,
}

impl SampleCount {
    pub fn count(self) -> u32 {
        match self {
            SampleCount::S1 => 1,
            SampleCount::S2 => 2,
            SampleCount::S4 => 4,
            SampleCount::S8 => 8,
            SampleCount::S16 => 16,
            SampleCount::S32 => 32,
            SampleCount::S64 => 64,
        }
    }
}

/// Format and layout of one attachment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttachmentFormat {
    pub format: Format,
    pub layout: ImageLayout,
}

impl AttachmentFormat {
    pub fn new(format: Format, layout: ImageLayout) -> Self {
        Self { format, layout }
    }
}

/// Everything that makes two render passes compatible
///
/// Color slot order is significant: slot `i` is attachment reference `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderPassFormat {
    pub sample_count: SampleCount,
    pub depth: AttachmentFormat,
    pub color: [AttachmentFormat; MAX_NUM_RENDER_TARGETS],
}

impl RenderPassFormat {
    /// Whether slot `index` has a color attachment
    pub fn has_color(&self, index: usize) -> bool {
        self.color[index].format.is_defined()
    }

    pub fn has_depth(&self) -> bool {
        self.depth.format.is_defined()
    }

    /// Number of bound color attachments
    pub fn color_count(&self) -> usize {
        self.color.iter().filter(|c| c.format.is_defined()).count()
    }
}
