//! Error codes for the bootstrap steps.

use std::fmt;

use crate::steps::StepFailure;

/// Distinct failure code per bootstrap concern.
///
/// Values are stable; they are what a failed sequence reports as its `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum BootstrapCode {
    WindowCreation = 1,
    RequiredExtensionMissing = 2,
    InstanceCreation = 3,
    SurfaceCreation = 4,
    NoSuitableDevice = 5,
    LogicalDeviceCreation = 6,
    SwapchainCreation = 7,
    ImageViewCreation = 8,
    RenderPassCreation = 9,
    VertexShaderRead = 10,
    FragmentShaderRead = 11,
    VertexShaderModule = 12,
    FragmentShaderModule = 13,
    PipelineLayoutCreation = 14,
    PipelineCreation = 15,
    FramebufferCreation = 16,
    CommandPoolCreation = 17,
    CommandBufferAllocation = 18,
    CommandBufferRecording = 19,
    SemaphoreCreation = 20,
}

impl BootstrapCode {
    pub const ALL: [BootstrapCode; 20] = [
        Self::WindowCreation,
        Self::RequiredExtensionMissing,
        Self::InstanceCreation,
        Self::SurfaceCreation,
        Self::NoSuitableDevice,
        Self::LogicalDeviceCreation,
        Self::SwapchainCreation,
        Self::ImageViewCreation,
        Self::RenderPassCreation,
        Self::VertexShaderRead,
        Self::FragmentShaderRead,
        Self::VertexShaderModule,
        Self::FragmentShaderModule,
        Self::PipelineLayoutCreation,
        Self::PipelineCreation,
        Self::FramebufferCreation,
        Self::CommandPoolCreation,
        Self::CommandBufferAllocation,
        Self::CommandBufferRecording,
        Self::SemaphoreCreation,
    ];

    /// Integer value reported in a failed outcome.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a code by its integer value.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Build a step failure with this code.
    pub fn failure(self, message: impl Into<String>) -> StepFailure {
        StepFailure {
            code: self.code(),
            message: message.into(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::WindowCreation => "window_creation",
            Self::RequiredExtensionMissing => "required_extension_missing",
            Self::InstanceCreation => "instance_creation",
            Self::SurfaceCreation => "surface_creation",
            Self::NoSuitableDevice => "no_suitable_device",
            Self::LogicalDeviceCreation => "logical_device_creation",
            Self::SwapchainCreation => "swapchain_creation",
            Self::ImageViewCreation => "image_view_creation",
            Self::RenderPassCreation => "render_pass_creation",
            Self::VertexShaderRead => "vertex_shader_read",
            Self::FragmentShaderRead => "fragment_shader_read",
            Self::VertexShaderModule => "vertex_shader_module",
            Self::FragmentShaderModule => "fragment_shader_module",
            Self::PipelineLayoutCreation => "pipeline_layout_creation",
            Self::PipelineCreation => "pipeline_creation",
            Self::FramebufferCreation => "framebuffer_creation",
            Self::CommandPoolCreation => "command_pool_creation",
            Self::CommandBufferAllocation => "command_buffer_allocation",
            Self::CommandBufferRecording => "command_buffer_recording",
            Self::SemaphoreCreation => "semaphore_creation",
        }
    }
}

impl fmt::Display for BootstrapCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_distinct() {
        let codes: HashSet<i32> = BootstrapCode::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), BootstrapCode::ALL.len());
    }

    #[test]
    fn from_code_round_trips_known_values() {
        assert_eq!(
            BootstrapCode::from_code(7),
            Some(BootstrapCode::SwapchainCreation)
        );
        assert_eq!(BootstrapCode::from_code(0), None);
        assert_eq!(BootstrapCode::from_code(99), None);
    }

    #[test]
    fn failure_carries_code_and_message() {
        let failure = BootstrapCode::SurfaceCreation.failure("no surface");
        assert_eq!(failure.code, 4);
        assert_eq!(failure.message, "no surface");
    }

    #[test]
    fn display_includes_name_and_value() {
        assert_eq!(
            BootstrapCode::NoSuitableDevice.to_string(),
            "no_suitable_device (5)"
        );
    }
}
