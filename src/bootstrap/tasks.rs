//! The bootstrap sequence: sixteen steps from window to semaphores.
//!
//! Each step either stores everything it created in the context or releases
//! what it created before failing. Registration into the ledger happens in
//! the commit hooks, after a step has succeeded.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::BootConfig;
use crate::context::Slot;
use crate::ledger::{ReleaseError, ResourceLedger};
use crate::steps::{Step, StepFailure, StepOutcome};

use super::codes::BootstrapCode;
use super::context::{GraphicsContext, HandleField, HandleListField, Swapchain};
use super::platform::{Extent, Handle, Platform, PlatformError, ResourceKind};

/// Name the bootstrap sequence reports under.
pub const SEQUENCE_NAME: &str = "Initialize window and graphics";

/// Instance extension that carries validation messages.
pub const DEBUG_EXTENSION: &str = "VK_EXT_debug_report";

const SPIRV_MAGIC: u32 = 0x0723_0203;

type StepResult = Result<(), StepFailure>;

/// Build the bootstrap steps, in execution order.
pub fn bootstrap_sequence<P: Platform + 'static>() -> Vec<Step<'static, GraphicsContext<P>>> {
    vec![
        step::<P>("Initialize window", init_window)
            .on_commit(|ctx, ledger| register_handle(ctx, ledger, HandleField::Window)),
        step::<P>("Check extensions", check_extensions),
        step::<P>("Initialize instance", init_instance)
            .on_commit(|ctx, ledger| register_handle(ctx, ledger, HandleField::Instance)),
        step::<P>("Initialize debug callback", init_debug_callback)
            .on_commit(|ctx, ledger| register_handle(ctx, ledger, HandleField::DebugCallback)),
        step::<P>("Create surface", create_surface)
            .on_commit(|ctx, ledger| register_handle(ctx, ledger, HandleField::Surface)),
        step::<P>("Pick physical device", pick_physical_device),
        step::<P>("Create logical device", create_logical_device)
            .on_commit(|ctx, ledger| register_handle(ctx, ledger, HandleField::Device)),
        step::<P>("Query surface support", query_surface_support),
        step::<P>("Create swapchain", create_swapchain).on_commit(register_swapchain::<P>),
        step::<P>("Create image views", create_image_views).on_commit(|ctx, ledger| {
            register_handle_list(ctx, ledger, HandleListField::ImageViews)
        }),
        step::<P>("Create render pass", create_render_pass)
            .on_commit(|ctx, ledger| register_handle(ctx, ledger, HandleField::RenderPass)),
        step::<P>("Create graphics pipeline", create_pipeline).on_commit(|ctx, ledger| {
            for field in [
                HandleField::VertexShader,
                HandleField::FragmentShader,
                HandleField::PipelineLayout,
                HandleField::Pipeline,
            ] {
                register_handle(ctx, ledger, field);
            }
        }),
        step::<P>("Create framebuffers", create_framebuffers).on_commit(|ctx, ledger| {
            register_handle_list(ctx, ledger, HandleListField::Framebuffers)
        }),
        step::<P>("Create command pool", create_command_pool)
            .on_commit(|ctx, ledger| register_handle(ctx, ledger, HandleField::CommandPool)),
        step::<P>("Create command buffers", create_command_buffers).on_commit(|ctx, ledger| {
            register_handle_list(ctx, ledger, HandleListField::CommandBuffers)
        }),
        step::<P>("Create semaphores", create_semaphores).on_commit(|ctx, ledger| {
            register_handle(ctx, ledger, HandleField::ImageAvailable);
            register_handle(ctx, ledger, HandleField::RenderFinished);
        }),
    ]
}

fn step<P: Platform + 'static>(
    description: &str,
    work: fn(&mut GraphicsContext<P>) -> StepResult,
) -> Step<'static, GraphicsContext<P>> {
    Step::new(description, move |ctx: &mut GraphicsContext<P>| {
        StepOutcome::from(work(ctx))
    })
}

fn init_window<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::WindowCreation;
    let window = ctx
        .platform
        .acquire(ResourceKind::Window, &[])
        .map_err(|e| code.failure(format!("Failed to create window: {}", e)))?;
    tracing::debug!(
        "Opened {}x{} window \"{}\"",
        ctx.config.window.width,
        ctx.config.window.height,
        ctx.config.window.title
    );
    store_all(ctx, &[(HandleField::Window, window)], code)
}

fn check_extensions<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::RequiredExtensionMissing;
    let available = ctx.platform.available_extensions();
    let mut enabled = ctx.platform.window_extensions();

    if let Some(missing) = enabled.iter().find(|e| !available.contains(*e)) {
        return Err(code.failure(format!("Missing required extension: {}", missing)));
    }

    if ctx.config.validation.is_enabled() {
        if available.iter().any(|e| e == DEBUG_EXTENSION) {
            enabled.push(DEBUG_EXTENSION.to_string());
        } else {
            tracing::warn!(
                "{} is not available, validation messages will not be reported",
                DEBUG_EXTENSION
            );
        }
    }

    tracing::debug!("Enabled extensions: {}", enabled.join(", "));
    fill(&mut ctx.extensions, enabled, code)
}

fn init_instance<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::InstanceCreation;
    let layers = if ctx.config.validation.is_enabled() {
        let available = ctx.platform.available_layers();
        let requested = &ctx.config.validation.layers;
        if requested.iter().all(|l| available.contains(l)) {
            requested.clone()
        } else {
            tracing::warn!("Validation layers requested, but not available");
            Vec::new()
        }
    } else {
        Vec::new()
    };

    fill(&mut ctx.layers, layers, code)?;

    let instance = ctx
        .platform
        .acquire(ResourceKind::Instance, &[])
        .map_err(|e| code.failure(format!("Failed to create instance: {}", e)))?;
    store_all(ctx, &[(HandleField::Instance, instance)], code)
}

/// Never fails the sequence: a missing debug callback only loses messages.
fn init_debug_callback<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let has_layers = ctx.layers.get().is_some_and(|l| !l.is_empty());
    let has_extension = ctx
        .extensions
        .get()
        .is_some_and(|e| e.iter().any(|x| x == DEBUG_EXTENSION));
    if !has_layers || !has_extension {
        tracing::debug!("Validation inactive, skipping debug callback");
        return Ok(());
    }

    let Some(instance) = ctx.instance.copied() else {
        tracing::warn!("Failed to set up debug callback: instance is not initialized");
        return Ok(());
    };

    let stored = ctx
        .platform
        .acquire(ResourceKind::DebugCallback, &[instance])
        .map_err(|e| e.to_string())
        .and_then(|callback| {
            store_all(
                ctx,
                &[(HandleField::DebugCallback, callback)],
                BootstrapCode::InstanceCreation,
            )
            .map_err(|f| f.message)
        });
    if let Err(message) = stored {
        tracing::warn!("Failed to set up debug callback: {}", message);
    }
    Ok(())
}

fn create_surface<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::SurfaceCreation;
    let instance = require(&ctx.instance, code)?;
    let window = require(&ctx.window, code)?;
    let surface = ctx
        .platform
        .acquire(ResourceKind::Surface, &[instance, window])
        .map_err(|e| code.failure(format!("Failed to create window surface: {}", e)))?;
    store_all(ctx, &[(HandleField::Surface, surface)], code)
}

fn pick_physical_device<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::NoSuitableDevice;
    let devices = ctx.platform.physical_devices();
    if devices.is_empty() {
        return Err(code.failure("Failed to find GPUs with graphics support"));
    }

    let required = &ctx.config.device_extensions;
    let chosen = devices.into_iter().find_map(|device| {
        if !device.discrete || !device.supports_all(required) {
            return None;
        }
        device.graphics_present_family().map(|family| (device, family))
    });
    let (device, family) = chosen.ok_or_else(|| code.failure("Failed to find a suitable GPU"))?;

    tracing::info!("Using {} (queue family {})", device.name, family);
    fill(&mut ctx.physical_device, device, code)?;
    fill(&mut ctx.queue_family, family, code)
}

fn create_logical_device<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::LogicalDeviceCreation;
    let instance = require(&ctx.instance, code)?;
    require(&ctx.queue_family, code)?;
    let device = ctx
        .platform
        .acquire(ResourceKind::Device, &[instance])
        .map_err(|e| code.failure(format!("Failed to create logical device: {}", e)))?;
    store_all(ctx, &[(HandleField::Device, device)], code)
}

fn query_surface_support<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::SwapchainCreation;
    let support = match ctx.physical_device.get() {
        Some(device) => ctx.platform.surface_support(device),
        None => return Err(not_initialized(&ctx.physical_device, code)),
    };
    if support.formats.is_empty() || support.present_modes.is_empty() {
        return Err(code.failure("Swapchain support is inadequate for the surface"));
    }
    fill(&mut ctx.surface_support, support, code)
}

fn create_swapchain<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::SwapchainCreation;
    let device = require(&ctx.device, code)?;
    let surface = require(&ctx.surface, code)?;
    let support = ctx
        .surface_support
        .get()
        .cloned()
        .ok_or_else(|| not_initialized(&ctx.surface_support, code))?;

    let format = support
        .formats
        .first()
        .cloned()
        .ok_or_else(|| code.failure("Surface reports no formats"))?;
    let present_mode = support
        .present_modes
        .first()
        .cloned()
        .ok_or_else(|| code.failure("Surface reports no present modes"))?;
    let extent = support.current_extent.unwrap_or(Extent {
        width: ctx.config.window.width,
        height: ctx.config.window.height,
    });
    let count = support.image_count();

    let handle = ctx
        .platform
        .acquire(ResourceKind::Swapchain, &[device, surface])
        .map_err(|e| code.failure(format!("Failed to create swapchain: {}", e)))?;
    let images = match ctx.platform.swapchain_images(handle, count) {
        Ok(images) => images,
        Err(e) => {
            rollback(&mut ctx.platform, &[(ResourceKind::Swapchain, handle)]);
            return Err(code.failure(format!("Failed to get swapchain images: {}", e)));
        }
    };

    tracing::debug!(
        "Swapchain {}x{} with {} images ({}, {})",
        extent.width,
        extent.height,
        images.len(),
        format,
        present_mode
    );
    let filled = ctx
        .swapchain
        .try_fill(Swapchain {
            handle,
            images,
            extent,
            format,
            present_mode,
        })
        .map(|_| ());
    if let Err(e) = filled {
        rollback(&mut ctx.platform, &[(ResourceKind::Swapchain, handle)]);
        return Err(code.failure(e.to_string()));
    }
    Ok(())
}

fn create_image_views<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::ImageViewCreation;
    let device = require(&ctx.device, code)?;
    let (swapchain, image_count) = match ctx.swapchain.get() {
        Some(s) => (s.handle, s.images.len()),
        None => return Err(not_initialized(&ctx.swapchain, code)),
    };

    let mut acquired = Vec::with_capacity(image_count);
    for _ in 0..image_count {
        acquire_or_rollback(
            &mut ctx.platform,
            ResourceKind::ImageView,
            &[device, swapchain],
            &mut acquired,
            code,
        )?;
    }
    store_list(ctx, HandleListField::ImageViews, acquired, code)
}

fn create_render_pass<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::RenderPassCreation;
    let device = require(&ctx.device, code)?;
    let render_pass = ctx
        .platform
        .acquire(ResourceKind::RenderPass, &[device])
        .map_err(|e| code.failure(format!("Failed to create render pass: {}", e)))?;
    store_all(ctx, &[(HandleField::RenderPass, render_pass)], code)
}

fn create_pipeline<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let device = require(&ctx.device, BootstrapCode::PipelineCreation)?;
    let render_pass = require(&ctx.render_pass, BootstrapCode::PipelineCreation)?;

    let (vertex_code, fragment_code) = read_shaders(&ctx.config)?;
    check_shader(&vertex_code, "vertex", BootstrapCode::VertexShaderModule)?;
    check_shader(&fragment_code, "fragment", BootstrapCode::FragmentShaderModule)?;

    let mut acquired = Vec::with_capacity(4);
    let vertex = acquire_or_rollback(
        &mut ctx.platform,
        ResourceKind::ShaderModule,
        &[device],
        &mut acquired,
        BootstrapCode::VertexShaderModule,
    )?;
    let fragment = acquire_or_rollback(
        &mut ctx.platform,
        ResourceKind::ShaderModule,
        &[device],
        &mut acquired,
        BootstrapCode::FragmentShaderModule,
    )?;
    let layout = acquire_or_rollback(
        &mut ctx.platform,
        ResourceKind::PipelineLayout,
        &[device],
        &mut acquired,
        BootstrapCode::PipelineLayoutCreation,
    )?;
    let pipeline = acquire_or_rollback(
        &mut ctx.platform,
        ResourceKind::Pipeline,
        &[device, layout, render_pass],
        &mut acquired,
        BootstrapCode::PipelineCreation,
    )?;

    store_all(
        ctx,
        &[
            (HandleField::VertexShader, vertex),
            (HandleField::FragmentShader, fragment),
            (HandleField::PipelineLayout, layout),
            (HandleField::Pipeline, pipeline),
        ],
        BootstrapCode::PipelineCreation,
    )
}

fn create_framebuffers<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::FramebufferCreation;
    let device = require(&ctx.device, code)?;
    let render_pass = require(&ctx.render_pass, code)?;
    let views = ctx
        .image_views
        .get()
        .cloned()
        .ok_or_else(|| not_initialized(&ctx.image_views, code))?;

    let mut acquired = Vec::with_capacity(views.len());
    for view in views {
        acquire_or_rollback(
            &mut ctx.platform,
            ResourceKind::Framebuffer,
            &[device, render_pass, view],
            &mut acquired,
            code,
        )?;
    }
    store_list(ctx, HandleListField::Framebuffers, acquired, code)
}

fn create_command_pool<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::CommandPoolCreation;
    let device = require(&ctx.device, code)?;
    let family = require(&ctx.queue_family, code)?;
    let pool = ctx
        .platform
        .acquire(ResourceKind::CommandPool, &[device])
        .map_err(|e| code.failure(format!("Failed to create command pool: {}", e)))?;
    tracing::debug!("Command pool for queue family {}", family);
    store_all(ctx, &[(HandleField::CommandPool, pool)], code)
}

fn create_command_buffers<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::CommandBufferAllocation;
    let pool = require(&ctx.command_pool, code)?;
    let count = ctx
        .framebuffers
        .get()
        .map(Vec::len)
        .ok_or_else(|| not_initialized(&ctx.framebuffers, code))?;

    let mut acquired = Vec::with_capacity(count);
    for _ in 0..count {
        acquire_or_rollback(
            &mut ctx.platform,
            ResourceKind::CommandBuffer,
            &[pool],
            &mut acquired,
            code,
        )?;
    }

    for (_, buffer) in &acquired {
        if let Err(e) = ctx.platform.record(*buffer) {
            rollback(&mut ctx.platform, &acquired);
            return Err(BootstrapCode::CommandBufferRecording
                .failure(format!("Failed to record command buffer: {}", e)));
        }
    }
    store_list(ctx, HandleListField::CommandBuffers, acquired, code)
}

fn create_semaphores<P: Platform>(ctx: &mut GraphicsContext<P>) -> StepResult {
    let code = BootstrapCode::SemaphoreCreation;
    let device = require(&ctx.device, code)?;

    let mut acquired = Vec::with_capacity(2);
    let image_available = acquire_or_rollback(
        &mut ctx.platform,
        ResourceKind::Semaphore,
        &[device],
        &mut acquired,
        code,
    )?;
    let render_finished = acquire_or_rollback(
        &mut ctx.platform,
        ResourceKind::Semaphore,
        &[device],
        &mut acquired,
        code,
    )?;

    store_all(
        ctx,
        &[
            (HandleField::ImageAvailable, image_available),
            (HandleField::RenderFinished, render_finished),
        ],
        code,
    )
}

/// SPIR-V module consisting of the magic number alone.
pub fn placeholder_shader() -> Vec<u8> {
    SPIRV_MAGIC.to_le_bytes().to_vec()
}

fn read_shaders(config: &BootConfig) -> Result<(Vec<u8>, Vec<u8>), StepFailure> {
    match &config.shaders {
        Some(paths) => Ok((
            read_shader(&paths.vertex, BootstrapCode::VertexShaderRead)?,
            read_shader(&paths.fragment, BootstrapCode::FragmentShaderRead)?,
        )),
        None => Ok((placeholder_shader(), placeholder_shader())),
    }
}

fn read_shader(path: &Path, code: BootstrapCode) -> Result<Vec<u8>, StepFailure> {
    fs::read(path).map_err(|e| code.failure(format!("Failed to read {}: {}", path.display(), e)))
}

fn check_shader(bytes: &[u8], stage: &str, code: BootstrapCode) -> StepResult {
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(code.failure(format!(
            "Invalid {} shader: {} bytes is not a whole number of words",
            stage,
            bytes.len()
        )));
    }
    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if magic != SPIRV_MAGIC {
        return Err(code.failure(format!(
            "Invalid {} shader: missing SPIR-V magic number",
            stage
        )));
    }
    Ok(())
}

fn require<T: Copy>(slot: &Slot<T>, code: BootstrapCode) -> Result<T, StepFailure> {
    slot.copied().ok_or_else(|| not_initialized(slot, code))
}

fn not_initialized<T>(slot: &Slot<T>, code: BootstrapCode) -> StepFailure {
    code.failure(format!("{} is not initialized", slot.name()))
}

fn fill<T>(slot: &mut Slot<T>, value: T, code: BootstrapCode) -> StepResult {
    slot.try_fill(value)
        .map(|_| ())
        .map_err(|e| code.failure(e.to_string()))
}

/// Store freshly acquired handles, releasing all of them if any target
/// field is already occupied.
fn store_all<P: Platform>(
    ctx: &mut GraphicsContext<P>,
    entries: &[(HandleField, Handle)],
    code: BootstrapCode,
) -> StepResult {
    for (field, _) in entries {
        if ctx.handle_slot(*field).is_present() {
            let acquired: Vec<_> = entries.iter().map(|(f, h)| (f.kind(), *h)).collect();
            rollback(&mut ctx.platform, &acquired);
            let name = ctx.handle_slot(*field).name();
            return Err(code.failure(format!("{} is already initialized", name)));
        }
    }
    for (field, handle) in entries {
        ctx.handle_slot(*field)
            .try_fill(*handle)
            .map_err(|e| code.failure(e.to_string()))?;
    }
    Ok(())
}

fn store_list<P: Platform>(
    ctx: &mut GraphicsContext<P>,
    field: HandleListField,
    acquired: Vec<(ResourceKind, Handle)>,
    code: BootstrapCode,
) -> StepResult {
    let handles: Vec<Handle> = acquired.iter().map(|(_, h)| *h).collect();
    let filled = ctx.handle_list_slot(field).try_fill(handles).map(|_| ());
    if let Err(e) = filled {
        rollback(&mut ctx.platform, &acquired);
        return Err(code.failure(e.to_string()));
    }
    Ok(())
}

fn acquire_or_rollback<P: Platform>(
    platform: &mut P,
    kind: ResourceKind,
    parents: &[Handle],
    acquired: &mut Vec<(ResourceKind, Handle)>,
    code: BootstrapCode,
) -> Result<Handle, StepFailure> {
    match platform.acquire(kind, parents) {
        Ok(handle) => {
            acquired.push((kind, handle));
            Ok(handle)
        }
        Err(e) => {
            rollback(platform, acquired);
            acquired.clear();
            Err(code.failure(format!("Failed to create {}: {}", kind, e)))
        }
    }
}

/// Release handles created by a step that is about to fail, newest first.
fn rollback<P: Platform>(platform: &mut P, acquired: &[(ResourceKind, Handle)]) {
    for (kind, handle) in acquired.iter().rev() {
        if let Err(e) = platform.release(*kind, *handle) {
            tracing::warn!("Failed to roll back {} {}: {}", kind, handle, e);
        }
    }
}

fn register_handle<P: Platform + 'static>(
    ctx: &mut GraphicsContext<P>,
    ledger: &mut ResourceLedger<GraphicsContext<P>>,
    field: HandleField,
) {
    let Some(handle) = ctx.handle_slot(field).copied() else {
        return;
    };
    let kind = field.kind();
    ledger.register(kind.as_str(), handle, move |ctx: &mut GraphicsContext<P>| {
        ctx.handle_slot(field).take();
        ctx.platform.release(kind, handle).map_err(ReleaseError::from)
    });
}

fn register_handle_list<P: Platform + 'static>(
    ctx: &mut GraphicsContext<P>,
    ledger: &mut ResourceLedger<GraphicsContext<P>>,
    field: HandleListField,
) {
    let Some(handles) = ctx.handle_list_slot(field).get().cloned() else {
        return;
    };
    let kind = field.kind();
    let label = HandleList(&handles).to_string();
    ledger.register(kind.as_str(), label, move |ctx: &mut GraphicsContext<P>| {
        ctx.handle_list_slot(field).take();
        release_handles(&mut ctx.platform, kind, &handles).map_err(ReleaseError::from)
    });
}

fn register_swapchain<P: Platform + 'static>(
    ctx: &mut GraphicsContext<P>,
    ledger: &mut ResourceLedger<GraphicsContext<P>>,
) {
    let Some(handle) = ctx.swapchain.get().map(|s| s.handle) else {
        return;
    };
    ledger.register(
        ResourceKind::Swapchain.as_str(),
        handle,
        move |ctx: &mut GraphicsContext<P>| {
            ctx.swapchain.take();
            ctx.platform
                .release(ResourceKind::Swapchain, handle)
                .map_err(ReleaseError::from)
        },
    );
}

/// Release every handle in a list, newest first.
///
/// Keeps going past failures and returns the first one.
fn release_handles<P: Platform>(
    platform: &mut P,
    kind: ResourceKind,
    handles: &[Handle],
) -> Result<(), PlatformError> {
    let mut first_error = None;
    for handle in handles.iter().rev() {
        if let Err(e) = platform.release(kind, *handle) {
            tracing::warn!("Failed to release {} {}: {}", kind, handle, e);
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct HandleList<'a>(&'a [Handle]);

impl fmt::Display for HandleList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, handle) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", handle)?;
        }
        write!(f, "]")
    }
}
