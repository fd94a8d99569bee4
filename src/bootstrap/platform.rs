//! The window-system and graphics collaborator the bootstrap steps call into.
//!
//! The bootstrap never talks to a real graphics API directly. It asks a
//! [`Platform`] to create and destroy opaque handles and to describe what the
//! machine supports.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::ReleaseError;

/// Opaque handle returned by a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Kinds of resources a platform can create.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ResourceKind {
    Window,
    Instance,
    DebugCallback,
    Surface,
    Device,
    Swapchain,
    ImageView,
    RenderPass,
    ShaderModule,
    PipelineLayout,
    Pipeline,
    Framebuffer,
    CommandPool,
    CommandBuffer,
    Semaphore,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Instance => "instance",
            Self::DebugCallback => "debug_callback",
            Self::Surface => "surface",
            Self::Device => "device",
            Self::Swapchain => "swapchain",
            Self::ImageView => "image_view",
            Self::RenderPass => "render_pass",
            Self::ShaderModule => "shader_module",
            Self::PipelineLayout => "pipeline_layout",
            Self::Pipeline => "pipeline",
            Self::Framebuffer => "framebuffer",
            Self::CommandPool => "command_pool",
            Self::CommandBuffer => "command_buffer",
            Self::Semaphore => "semaphore",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed platform call.
///
/// `code` follows graphics-API result conventions: negative values are errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (error code {code})")]
pub struct PlatformError {
    pub code: i32,
    pub message: String,
}

impl PlatformError {
    pub const INITIALIZATION_FAILED: i32 = -3;
    pub const DEVICE_LOST: i32 = -4;
    pub const INVALID_HANDLE: i32 = -1000;
    pub const IN_USE: i32 = -1001;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<PlatformError> for ReleaseError {
    fn from(err: PlatformError) -> Self {
        ReleaseError::new(err.code, err.message)
    }
}

/// A queue family exposed by a physical device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueFamily {
    #[serde(default)]
    pub graphics: bool,
    #[serde(default)]
    pub present: bool,
    #[serde(default = "default_queue_count")]
    pub count: u32,
}

fn default_queue_count() -> u32 {
    1
}

/// A physical device as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    #[serde(default)]
    pub discrete: bool,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub queue_families: Vec<QueueFamily>,
}

impl DeviceInfo {
    /// Index of the first family that can both draw and present.
    pub fn graphics_present_family(&self) -> Option<u32> {
        self.queue_families
            .iter()
            .position(|q| q.graphics && q.present && q.count > 0)
            .map(|i| i as u32)
    }

    /// Check whether every named extension is supported.
    pub fn supports_all(&self, required: &[String]) -> bool {
        required.iter().all(|ext| self.extensions.contains(ext))
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

/// What a surface supports on a given device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSupport {
    pub min_images: u32,
    /// Zero means no upper bound.
    #[serde(default)]
    pub max_images: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_extent: Option<Extent>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub present_modes: Vec<String>,
}

impl SurfaceSupport {
    /// One image more than the minimum, capped by the maximum when there is one.
    pub fn image_count(&self) -> u32 {
        let wanted = self.min_images.saturating_add(1);
        if self.max_images > 0 && wanted > self.max_images {
            self.max_images
        } else {
            wanted
        }
    }
}

/// Window-system and graphics calls needed to bring up a rendering context.
///
/// `acquire` takes the live handles the new resource depends on; a platform
/// may refuse to release a handle while something acquired from it is alive.
pub trait Platform {
    /// Instance extensions the platform can enable.
    fn available_extensions(&self) -> Vec<String>;

    /// Instance extensions the window system needs.
    fn window_extensions(&self) -> Vec<String>;

    /// Validation layers the platform can enable.
    fn available_layers(&self) -> Vec<String>;

    /// Physical devices visible to the instance.
    fn physical_devices(&self) -> Vec<DeviceInfo>;

    /// Surface capabilities for a device.
    fn surface_support(&self, device: &DeviceInfo) -> SurfaceSupport;

    /// Create a resource depending on `parents`.
    fn acquire(&mut self, kind: ResourceKind, parents: &[Handle]) -> Result<Handle, PlatformError>;

    /// Images owned by a swapchain; they are released with it.
    fn swapchain_images(&mut self, swapchain: Handle, count: u32)
        -> Result<Vec<Handle>, PlatformError>;

    /// Record the default draw commands into a command buffer.
    fn record(&mut self, command_buffer: Handle) -> Result<(), PlatformError>;

    /// Destroy a resource.
    fn release(&mut self, kind: ResourceKind, handle: Handle) -> Result<(), PlatformError>;
}
