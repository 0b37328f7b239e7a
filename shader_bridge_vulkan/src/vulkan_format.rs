/// Conversions from the neutral description types to Vulkan enums and flags
///
/// The flag sets of the core already use Vulkan's bit values, so they convert
/// with `from_raw`; enums are mapped one by one.

use ash::vk;
use shader_bridge::bridge::render::{
    AccessFlags, DependencyFlags, Format, ImageLayout, LoadOp, PipelineStages, SampleCount, StoreOp,
};
use shader_bridge::bridge::shader::{
    DescriptorType, ImageViewType, ShaderStage, ShaderStageFlags,
};

/// Convert Format to Vulkan
pub fn format_to_vk(format: Format) -> vk::Format {
    match format {
        Format::UNDEFINED => vk::Format::UNDEFINED,
        Format::R8_UNORM => vk::Format::R8_UNORM,
        Format::R8G8_UNORM => vk::Format::R8G8_UNORM,
        Format::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
        Format::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        Format::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
        Format::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
        Format::A2B10G10R10_UNORM => vk::Format::A2B10G10R10_UNORM_PACK32,
        Format::B10G11R11_UFLOAT => vk::Format::B10G11R11_UFLOAT_PACK32,
        Format::R16G16B16A16_SFLOAT => vk::Format::R16G16B16A16_SFLOAT,
        Format::R32_SFLOAT => vk::Format::R32_SFLOAT,
        Format::R32G32_SFLOAT => vk::Format::R32G32_SFLOAT,
        Format::R32G32B32A32_SFLOAT => vk::Format::R32G32B32A32_SFLOAT,
        Format::R32_UINT => vk::Format::R32_UINT,
        Format::D16_UNORM => vk::Format::D16_UNORM,
        Format::D32_FLOAT => vk::Format::D32_SFLOAT,
        Format::S8_UINT => vk::Format::S8_UINT,
        Format::D24_UNORM_S8_UINT => vk::Format::D24_UNORM_S8_UINT,
        Format::D32_FLOAT_S8_UINT => vk::Format::D32_SFLOAT_S8_UINT,
    }
}

/// Convert ImageLayout to Vulkan
pub fn image_layout_to_vk(layout: ImageLayout) -> vk::ImageLayout {
    match layout {
        ImageLayout::Undefined => vk::ImageLayout::UNDEFINED,
        ImageLayout::General => vk::ImageLayout::GENERAL,
        ImageLayout::ColorAttachment => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        ImageLayout::DepthStencilAttachment => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        ImageLayout::DepthStencilReadOnly => vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL,
        ImageLayout::ShaderReadOnly => vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        ImageLayout::TransferSrc => vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
        ImageLayout::TransferDst => vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        ImageLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
    }
}

pub fn sample_count_to_vk(count: SampleCount) -> vk::SampleCountFlags {
    match count {
        SampleCount::S1 => vk::SampleCountFlags::TYPE_1,
        SampleCount::S2 => vk::SampleCountFlags::TYPE_2,
        SampleCount::S4 => vk::SampleCountFlags::TYPE_4,
        SampleCount::S8 => vk::SampleCountFlags::TYPE_8,
        SampleCount::S16 => vk::SampleCountFlags::TYPE_16,
        SampleCount::S32 => vk::SampleCountFlags::TYPE_32,
        SampleCount::S64 => vk::SampleCountFlags::TYPE_64,
    }
}

/// Convert LoadOp to Vulkan
pub fn load_op_to_vk(load_op: LoadOp) -> vk::AttachmentLoadOp {
    match load_op {
        LoadOp::Load => vk::AttachmentLoadOp::LOAD,
        LoadOp::Clear => vk::AttachmentLoadOp::CLEAR,
        LoadOp::DontCare => vk::AttachmentLoadOp::DONT_CARE,
    }
}

/// Convert StoreOp to Vulkan
pub fn store_op_to_vk(store_op: StoreOp) -> vk::AttachmentStoreOp {
    match store_op {
        StoreOp::Store => vk::AttachmentStoreOp::STORE,
        StoreOp::DontCare => vk::AttachmentStoreOp::DONT_CARE,
    }
}

pub fn pipeline_stages_to_vk(stages: PipelineStages) -> vk::PipelineStageFlags {
    vk::PipelineStageFlags::from_raw(stages.bits())
}

pub fn access_flags_to_vk(access: AccessFlags) -> vk::AccessFlags {
    vk::AccessFlags::from_raw(access.bits())
}

pub fn dependency_flags_to_vk(flags: DependencyFlags) -> vk::DependencyFlags {
    vk::DependencyFlags::from_raw(flags.bits())
}

pub fn shader_stage_to_vk(stage: ShaderStage) -> vk::ShaderStageFlags {
    match stage {
        ShaderStage::Vertex => vk::ShaderStageFlags::VERTEX,
        ShaderStage::TessControl => vk::ShaderStageFlags::TESSELLATION_CONTROL,
        ShaderStage::TessEval => vk::ShaderStageFlags::TESSELLATION_EVALUATION,
        ShaderStage::Geometry => vk::ShaderStageFlags::GEOMETRY,
        ShaderStage::Fragment => vk::ShaderStageFlags::FRAGMENT,
        ShaderStage::Compute => vk::ShaderStageFlags::COMPUTE,
    }
}

pub fn shader_stage_flags_to_vk(flags: ShaderStageFlags) -> vk::ShaderStageFlags {
    vk::ShaderStageFlags::from_raw(flags.bits())
}

pub fn descriptor_type_to_vk(descriptor_type: DescriptorType) -> vk::DescriptorType {
    match descriptor_type {
        DescriptorType::Sampler => vk::DescriptorType::SAMPLER,
        DescriptorType::CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
        DescriptorType::SampledImage => vk::DescriptorType::SAMPLED_IMAGE,
        DescriptorType::StorageImage => vk::DescriptorType::STORAGE_IMAGE,
        DescriptorType::UniformTexelBuffer => vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
        DescriptorType::StorageTexelBuffer => vk::DescriptorType::STORAGE_TEXEL_BUFFER,
        DescriptorType::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
        DescriptorType::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        DescriptorType::UniformBufferDynamic => vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
        DescriptorType::StorageBufferDynamic => vk::DescriptorType::STORAGE_BUFFER_DYNAMIC,
    }
}

pub fn image_view_type_to_vk(view_type: ImageViewType) -> vk::ImageViewType {
    match view_type {
        ImageViewType::Image1D => vk::ImageViewType::TYPE_1D,
        ImageViewType::Image2D => vk::ImageViewType::TYPE_2D,
        ImageViewType::Image3D => vk::ImageViewType::TYPE_3D,
        ImageViewType::Cube => vk::ImageViewType::CUBE,
        ImageViewType::Image1DArray => vk::ImageViewType::TYPE_1D_ARRAY,
        ImageViewType::Image2DArray => vk::ImageViewType::TYPE_2D_ARRAY,
        ImageViewType::CubeArray => vk::ImageViewType::CUBE_ARRAY,
    }
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
