//! Integration tests for the graphics bootstrap on the headless platform.

use stagehand::bootstrap::{
    AcquireFault, Bootstrap, BootstrapCode, HeadlessPlatform, ResourceKind,
};
use stagehand::config::{BootConfig, ValidationMode};
use stagehand::report::MockReporter;
use stagehand::runner::RunPhase;

fn bootstrap_with(config: BootConfig) -> Bootstrap<HeadlessPlatform> {
    let platform = HeadlessPlatform::new(config.platform.clone());
    Bootstrap::new(config, platform)
}

fn enabled() -> BootConfig {
    let mut config = BootConfig::default();
    config.validation.mode = ValidationMode::Enabled;
    config
}

fn fail_at(kind: ResourceKind, nth: usize) -> BootConfig {
    let mut config = enabled();
    config.platform.faults.fail_acquire = Some(AcquireFault { kind, nth });
    config
}

#[test]
fn clean_run_releases_everything_in_reverse() {
    let mut boot = bootstrap_with(enabled());
    let mut reporter = MockReporter::new();
    let report = boot.run_to_teardown(&mut reporter).unwrap();

    assert!(report.is_success());
    assert_eq!(boot.phase(), RunPhase::TornDown);

    let platform = &boot.context().platform;
    assert!(platform.live_handles().is_empty());
    assert_eq!(
        platform.release_order(),
        vec![
            ResourceKind::Semaphore,
            ResourceKind::Semaphore,
            ResourceKind::CommandBuffer,
            ResourceKind::CommandBuffer,
            ResourceKind::CommandBuffer,
            ResourceKind::CommandPool,
            ResourceKind::Framebuffer,
            ResourceKind::Framebuffer,
            ResourceKind::Framebuffer,
            ResourceKind::Pipeline,
            ResourceKind::PipelineLayout,
            ResourceKind::ShaderModule,
            ResourceKind::ShaderModule,
            ResourceKind::RenderPass,
            ResourceKind::ImageView,
            ResourceKind::ImageView,
            ResourceKind::ImageView,
            ResourceKind::Swapchain,
            ResourceKind::Device,
            ResourceKind::Surface,
            ResourceKind::DebugCallback,
            ResourceKind::Instance,
            ResourceKind::Window,
        ]
    );
    assert!(boot.context().is_drained());
    assert_eq!(reporter.teardowns_started(), 1);
}

#[test]
fn fault_at_each_kind_reports_its_code_and_leaks_nothing() {
    let cases = [
        (ResourceKind::Window, 1, 0, BootstrapCode::WindowCreation),
        (ResourceKind::Instance, 1, 2, BootstrapCode::InstanceCreation),
        (ResourceKind::Surface, 1, 4, BootstrapCode::SurfaceCreation),
        (ResourceKind::Device, 1, 6, BootstrapCode::LogicalDeviceCreation),
        (ResourceKind::Swapchain, 1, 8, BootstrapCode::SwapchainCreation),
        (ResourceKind::ImageView, 2, 9, BootstrapCode::ImageViewCreation),
        (ResourceKind::RenderPass, 1, 10, BootstrapCode::RenderPassCreation),
        (ResourceKind::ShaderModule, 1, 11, BootstrapCode::VertexShaderModule),
        (ResourceKind::ShaderModule, 2, 11, BootstrapCode::FragmentShaderModule),
        (ResourceKind::PipelineLayout, 1, 11, BootstrapCode::PipelineLayoutCreation),
        (ResourceKind::Pipeline, 1, 11, BootstrapCode::PipelineCreation),
        (ResourceKind::Framebuffer, 3, 12, BootstrapCode::FramebufferCreation),
        (ResourceKind::CommandPool, 1, 13, BootstrapCode::CommandPoolCreation),
        (ResourceKind::CommandBuffer, 2, 14, BootstrapCode::CommandBufferAllocation),
        (ResourceKind::Semaphore, 2, 15, BootstrapCode::SemaphoreCreation),
    ];

    for (kind, nth, index, code) in cases {
        let mut boot = bootstrap_with(fail_at(kind, nth));
        let report = boot.run_to_teardown(&mut MockReporter::new()).unwrap();

        assert_eq!(
            report.outcome.failing_index(),
            Some(index),
            "{} #{}",
            kind,
            nth
        );
        assert_eq!(report.failure_code(), Some(code), "{} #{}", kind, nth);
        assert!(report.teardown.is_clean(), "{} #{}", kind, nth);
        assert!(
            boot.context().platform.live_handles().is_empty(),
            "{} #{} leaked {:?}",
            kind,
            nth,
            boot.context().platform.live_handles()
        );
        assert!(boot.context().is_drained(), "{} #{}", kind, nth);
    }
}

#[test]
fn debug_callback_fault_does_not_stop_the_sequence() {
    let mut boot = bootstrap_with(fail_at(ResourceKind::DebugCallback, 1));
    let report = boot.run_to_teardown(&mut MockReporter::new()).unwrap();

    assert!(report.outcome.is_ok());
    assert!(!boot
        .context()
        .platform
        .release_order()
        .contains(&ResourceKind::DebugCallback));
}

#[test]
fn failure_releases_only_what_earlier_steps_registered() {
    let mut boot = bootstrap_with(fail_at(ResourceKind::Device, 1));
    let mut reporter = MockReporter::new();
    boot.run_to_teardown(&mut reporter).unwrap();

    assert_eq!(
        reporter.release_order(),
        vec!["surface", "debug_callback", "instance", "window"]
    );
}

#[test]
fn release_failure_does_not_stop_teardown() {
    let mut config = enabled();
    config.platform.faults.fail_release = vec![ResourceKind::Swapchain, ResourceKind::Instance];
    let mut boot = bootstrap_with(config);
    let report = boot.run_to_teardown(&mut MockReporter::new()).unwrap();

    assert!(report.outcome.is_ok());
    assert!(!report.is_success());
    let failed: Vec<&str> = report
        .teardown
        .failures
        .iter()
        .map(|f| f.kind.as_str())
        .collect();
    assert_eq!(failed, vec!["swapchain", "instance"]);
    assert_eq!(report.teardown.attempted(), 17);
    assert!(boot.context().platform.live_handles().is_empty());
    assert!(boot.context().is_drained());
}

#[test]
fn no_suitable_device_fails_before_any_device_resource() {
    let mut config = enabled();
    config.platform.devices.clear();
    let mut boot = bootstrap_with(config);
    let report = boot.run_to_teardown(&mut MockReporter::new()).unwrap();

    assert_eq!(report.failure_code(), Some(BootstrapCode::NoSuitableDevice));
    assert_eq!(report.failed_step(), Some("Pick physical device"));
    assert!(boot.context().platform.live_handles().is_empty());
}

#[test]
fn teardown_is_idempotent() {
    let mut boot = bootstrap_with(enabled());
    boot.run(&mut MockReporter::new()).unwrap();

    let first = boot.teardown(&mut MockReporter::new()).unwrap();
    let second = boot.teardown(&mut MockReporter::new()).unwrap();
    assert_eq!(first.attempted(), 17);
    assert_eq!(second.attempted(), 0);
}
