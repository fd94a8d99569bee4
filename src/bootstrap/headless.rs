//! In-memory platform with fault injection.
//!
//! `HeadlessPlatform` hands out sequential handles, remembers which handles
//! each resource was acquired from, and refuses to release a handle while
//! anything acquired from it is still alive. Faults can be injected into
//! acquisition, release and command recording.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::platform::{
    DeviceInfo, Handle, Platform, PlatformError, QueueFamily, ResourceKind, SurfaceSupport,
};

/// Fail the `nth` acquisition (1-based) of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquireFault {
    pub kind: ResourceKind,
    #[serde(default = "default_nth")]
    pub nth: usize,
}

fn default_nth() -> usize {
    1
}

/// Faults to inject into a headless run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_acquire: Option<AcquireFault>,
    /// Releases of these kinds destroy the handle but report an error.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fail_release: Vec<ResourceKind>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fail_record: bool,
}

/// What the simulated machine supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessSettings {
    pub extensions: Vec<String>,
    pub window_extensions: Vec<String>,
    pub layers: Vec<String>,
    pub devices: Vec<DeviceInfo>,
    pub surface: SurfaceSupport,
    pub faults: FaultPlan,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "VK_KHR_surface".to_string(),
                "VK_KHR_xcb_surface".to_string(),
                "VK_EXT_debug_report".to_string(),
            ],
            window_extensions: vec![
                "VK_KHR_surface".to_string(),
                "VK_KHR_xcb_surface".to_string(),
            ],
            layers: vec!["VK_LAYER_LUNARG_standard_validation".to_string()],
            devices: vec![DeviceInfo {
                name: "Headless Discrete GPU".to_string(),
                discrete: true,
                extensions: vec!["VK_KHR_swapchain".to_string()],
                queue_families: vec![QueueFamily {
                    graphics: true,
                    present: true,
                    count: 1,
                }],
            }],
            surface: SurfaceSupport {
                min_images: 2,
                max_images: 3,
                current_extent: None,
                formats: vec!["B8G8R8A8_UNORM".to_string()],
                present_modes: vec!["FIFO".to_string()],
            },
            faults: FaultPlan::default(),
        }
    }
}

/// A call made against the headless platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Acquire(ResourceKind, Handle),
    Release(ResourceKind, Handle),
    Record(Handle),
}

#[derive(Debug, Clone)]
struct LiveHandle {
    handle: Handle,
    kind: ResourceKind,
    parents: Vec<Handle>,
}

/// In-memory [`Platform`].
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    settings: HeadlessSettings,
    next_handle: u64,
    live: Vec<LiveHandle>,
    acquired: HashMap<ResourceKind, usize>,
    calls: Vec<PlatformCall>,
}

impl HeadlessPlatform {
    pub fn new(settings: HeadlessSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Replace the fault plan.
    pub fn with_faults(mut self, faults: FaultPlan) -> Self {
        self.settings.faults = faults;
        self
    }

    pub fn settings(&self) -> &HeadlessSettings {
        &self.settings
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[PlatformCall] {
        &self.calls
    }

    /// Kinds released so far, in release order.
    pub fn release_order(&self) -> Vec<ResourceKind> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PlatformCall::Release(kind, _) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Handles still alive.
    pub fn live_handles(&self) -> Vec<(ResourceKind, Handle)> {
        self.live.iter().map(|l| (l.kind, l.handle)).collect()
    }

    fn is_live(&self, handle: Handle) -> bool {
        self.live.iter().any(|l| l.handle == handle)
    }

    fn allocate_handle(&mut self) -> Handle {
        self.next_handle += 1;
        Handle(self.next_handle)
    }
}

impl Platform for HeadlessPlatform {
    fn available_extensions(&self) -> Vec<String> {
        self.settings.extensions.clone()
    }

    fn window_extensions(&self) -> Vec<String> {
        self.settings.window_extensions.clone()
    }

    fn available_layers(&self) -> Vec<String> {
        self.settings.layers.clone()
    }

    fn physical_devices(&self) -> Vec<DeviceInfo> {
        self.settings.devices.clone()
    }

    fn surface_support(&self, _device: &DeviceInfo) -> SurfaceSupport {
        self.settings.surface.clone()
    }

    fn acquire(&mut self, kind: ResourceKind, parents: &[Handle]) -> Result<Handle, PlatformError> {
        if let Some(dead) = parents.iter().find(|p| !self.is_live(**p)) {
            return Err(PlatformError::new(
                PlatformError::INVALID_HANDLE,
                format!("cannot create {} from dead handle {}", kind, dead),
            ));
        }

        let count = self.acquired.entry(kind).or_insert(0);
        *count += 1;
        if let Some(fault) = self.settings.faults.fail_acquire {
            if fault.kind == kind && fault.nth == *count {
                return Err(PlatformError::new(
                    PlatformError::INITIALIZATION_FAILED,
                    format!("injected failure creating {}", kind),
                ));
            }
        }

        let handle = self.allocate_handle();
        self.live.push(LiveHandle {
            handle,
            kind,
            parents: parents.to_vec(),
        });
        self.calls.push(PlatformCall::Acquire(kind, handle));
        Ok(handle)
    }

    fn swapchain_images(
        &mut self,
        swapchain: Handle,
        count: u32,
    ) -> Result<Vec<Handle>, PlatformError> {
        if !self.is_live(swapchain) {
            return Err(PlatformError::new(
                PlatformError::INVALID_HANDLE,
                format!("unknown swapchain {}", swapchain),
            ));
        }
        Ok((0..count).map(|_| self.allocate_handle()).collect())
    }

    fn record(&mut self, command_buffer: Handle) -> Result<(), PlatformError> {
        if !self.is_live(command_buffer) {
            return Err(PlatformError::new(
                PlatformError::INVALID_HANDLE,
                format!("unknown command buffer {}", command_buffer),
            ));
        }
        if self.settings.faults.fail_record {
            return Err(PlatformError::new(
                PlatformError::DEVICE_LOST,
                "injected failure recording command buffer",
            ));
        }
        self.calls.push(PlatformCall::Record(command_buffer));
        Ok(())
    }

    fn release(&mut self, kind: ResourceKind, handle: Handle) -> Result<(), PlatformError> {
        let position = self
            .live
            .iter()
            .position(|l| l.handle == handle && l.kind == kind)
            .ok_or_else(|| {
                PlatformError::new(
                    PlatformError::INVALID_HANDLE,
                    format!("unknown {} {}", kind, handle),
                )
            })?;

        let children: Vec<ResourceKind> = self
            .live
            .iter()
            .filter(|l| l.parents.contains(&handle))
            .map(|l| l.kind)
            .collect();
        if !children.is_empty() {
            return Err(PlatformError::new(
                PlatformError::IN_USE,
                format!(
                    "{} {} still has live children: {}",
                    kind,
                    handle,
                    children
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ));
        }

        self.live.remove(position);
        self.calls.push(PlatformCall::Release(kind, handle));

        if self.settings.faults.fail_release.contains(&kind) {
            return Err(PlatformError::new(
                PlatformError::DEVICE_LOST,
                format!("injected failure destroying {}", kind),
            ));
        }
        Ok(())
    }
}
