//! Shared context threaded through the bootstrap steps.

use std::fmt;

use serde::Serialize;

use crate::config::BootConfig;
use crate::context::Slot;

use super::platform::{DeviceInfo, Extent, Handle, ResourceKind, SurfaceSupport};

/// A created swapchain and the images it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swapchain {
    pub handle: Handle,
    pub images: Vec<Handle>,
    pub extent: Extent,
    pub format: String,
    pub present_mode: String,
}

/// Context fields holding a single platform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleField {
    Window,
    Instance,
    DebugCallback,
    Surface,
    Device,
    RenderPass,
    VertexShader,
    FragmentShader,
    PipelineLayout,
    Pipeline,
    CommandPool,
    ImageAvailable,
    RenderFinished,
}

impl HandleField {
    pub fn kind(self) -> ResourceKind {
        match self {
            Self::Window => ResourceKind::Window,
            Self::Instance => ResourceKind::Instance,
            Self::DebugCallback => ResourceKind::DebugCallback,
            Self::Surface => ResourceKind::Surface,
            Self::Device => ResourceKind::Device,
            Self::RenderPass => ResourceKind::RenderPass,
            Self::VertexShader | Self::FragmentShader => ResourceKind::ShaderModule,
            Self::PipelineLayout => ResourceKind::PipelineLayout,
            Self::Pipeline => ResourceKind::Pipeline,
            Self::CommandPool => ResourceKind::CommandPool,
            Self::ImageAvailable | Self::RenderFinished => ResourceKind::Semaphore,
        }
    }
}

/// Context fields holding a list of platform handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleListField {
    ImageViews,
    Framebuffers,
    CommandBuffers,
}

impl HandleListField {
    pub fn kind(self) -> ResourceKind {
        match self {
            Self::ImageViews => ResourceKind::ImageView,
            Self::Framebuffers => ResourceKind::Framebuffer,
            Self::CommandBuffers => ResourceKind::CommandBuffer,
        }
    }
}

/// Everything the bootstrap creates, plus the config and platform it runs
/// against.
///
/// Resource fields start absent. A step fills the fields it creates; the
/// release action registered for a field empties it again.
pub struct GraphicsContext<P> {
    pub config: BootConfig,
    pub platform: P,

    pub window: Slot<Handle>,
    pub extensions: Slot<Vec<String>>,
    pub layers: Slot<Vec<String>>,
    pub instance: Slot<Handle>,
    pub debug_callback: Slot<Handle>,
    pub surface: Slot<Handle>,
    pub physical_device: Slot<DeviceInfo>,
    pub queue_family: Slot<u32>,
    pub device: Slot<Handle>,
    pub surface_support: Slot<SurfaceSupport>,
    pub swapchain: Slot<Swapchain>,
    pub image_views: Slot<Vec<Handle>>,
    pub render_pass: Slot<Handle>,
    pub vertex_shader: Slot<Handle>,
    pub fragment_shader: Slot<Handle>,
    pub pipeline_layout: Slot<Handle>,
    pub pipeline: Slot<Handle>,
    pub framebuffers: Slot<Vec<Handle>>,
    pub command_pool: Slot<Handle>,
    pub command_buffers: Slot<Vec<Handle>>,
    pub image_available: Slot<Handle>,
    pub render_finished: Slot<Handle>,
}

impl<P> GraphicsContext<P> {
    pub fn new(config: BootConfig, platform: P) -> Self {
        Self {
            config,
            platform,
            window: Slot::empty("window"),
            extensions: Slot::empty("extensions"),
            layers: Slot::empty("layers"),
            instance: Slot::empty("instance"),
            debug_callback: Slot::empty("debug_callback"),
            surface: Slot::empty("surface"),
            physical_device: Slot::empty("physical_device"),
            queue_family: Slot::empty("queue_family"),
            device: Slot::empty("device"),
            surface_support: Slot::empty("surface_support"),
            swapchain: Slot::empty("swapchain"),
            image_views: Slot::empty("image_views"),
            render_pass: Slot::empty("render_pass"),
            vertex_shader: Slot::empty("vertex_shader"),
            fragment_shader: Slot::empty("fragment_shader"),
            pipeline_layout: Slot::empty("pipeline_layout"),
            pipeline: Slot::empty("pipeline"),
            framebuffers: Slot::empty("framebuffers"),
            command_pool: Slot::empty("command_pool"),
            command_buffers: Slot::empty("command_buffers"),
            image_available: Slot::empty("image_available"),
            render_finished: Slot::empty("render_finished"),
        }
    }

    pub fn handle_slot(&mut self, field: HandleField) -> &mut Slot<Handle> {
        match field {
            HandleField::Window => &mut self.window,
            HandleField::Instance => &mut self.instance,
            HandleField::DebugCallback => &mut self.debug_callback,
            HandleField::Surface => &mut self.surface,
            HandleField::Device => &mut self.device,
            HandleField::RenderPass => &mut self.render_pass,
            HandleField::VertexShader => &mut self.vertex_shader,
            HandleField::FragmentShader => &mut self.fragment_shader,
            HandleField::PipelineLayout => &mut self.pipeline_layout,
            HandleField::Pipeline => &mut self.pipeline,
            HandleField::CommandPool => &mut self.command_pool,
            HandleField::ImageAvailable => &mut self.image_available,
            HandleField::RenderFinished => &mut self.render_finished,
        }
    }

    pub fn handle_list_slot(&mut self, field: HandleListField) -> &mut Slot<Vec<Handle>> {
        match field {
            HandleListField::ImageViews => &mut self.image_views,
            HandleListField::Framebuffers => &mut self.framebuffers,
            HandleListField::CommandBuffers => &mut self.command_buffers,
        }
    }

    /// Names of resource fields that still hold a handle.
    ///
    /// Selection results such as the chosen device or enabled extensions are
    /// plain data and are not listed.
    pub fn live_fields(&self) -> Vec<&'static str> {
        let handles = [
            &self.window,
            &self.instance,
            &self.debug_callback,
            &self.surface,
            &self.device,
            &self.render_pass,
            &self.vertex_shader,
            &self.fragment_shader,
            &self.pipeline_layout,
            &self.pipeline,
            &self.command_pool,
            &self.image_available,
            &self.render_finished,
        ];
        let lists = [&self.image_views, &self.framebuffers, &self.command_buffers];

        let mut live: Vec<&'static str> = handles
            .iter()
            .filter(|s| s.is_present())
            .map(|s| s.name())
            .collect();
        live.extend(lists.iter().filter(|s| s.is_present()).map(|s| s.name()));
        if self.swapchain.is_present() {
            live.push(self.swapchain.name());
        }
        live
    }

    /// Check whether every resource field is absent.
    pub fn is_drained(&self) -> bool {
        self.live_fields().is_empty()
    }
}

impl<P> fmt::Debug for GraphicsContext<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("app_name", &self.config.app_name)
            .field("live", &self.live_fields())
            .finish_non_exhaustive()
    }
}
