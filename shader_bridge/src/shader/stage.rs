/// Shader stages and stage masks

use bitflags::bitflags;

/// Pipeline stage a shader is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Hull shader
    TessControl,
    /// Domain shader
    TessEval,
    /// Geometry shader
    Geometry,
    /// Fragment/Pixel shader
    Fragment,
    /// Compute shader
    Compute,
}

impl ShaderStage {
    /// Every stage, in pipeline order
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEval,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
        ShaderStage::Compute,
    ];

    /// Single-bit mask for this stage
    pub fn flag(self) -> ShaderStageFlags {
        match self {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::TessControl => ShaderStageFlags::TESS_CONTROL,
            ShaderStage::TessEval => ShaderStageFlags::TESS_EVAL,
            ShaderStage::Geometry => ShaderStageFlags::GEOMETRY,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            ShaderStage::Compute => ShaderStageFlags::COMPUTE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessControl => "tess_control",
            ShaderStage::TessEval => "tess_eval",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }
}

bitflags! {
    /// Set of shader stages (bit values equal Vulkan's)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 0x01;
        const TESS_CONTROL = 0x02;
        const TESS_EVAL = 0x04;
        const GEOMETRY = 0x08;
        const FRAGMENT = 0x10;
        const COMPUTE = 0x20;
        const ALL_GRAPHICS = 0x1f;
    }
}

impl ShaderStageFlags {
    /// Mask covering every stage in `stages`
    pub fn from_stages(stages: &[ShaderStage]) -> Self {
        stages
            .iter()
            .fold(ShaderStageFlags::empty(), |flags, stage| flags | stage.flag())
    }
}

impl From<ShaderStage> for ShaderStageFlags {
    fn from(stage: ShaderStage) -> Self {
        stage.flag()
    }
}
