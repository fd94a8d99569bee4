//! Window and graphics bootstrap built on the sequence engine.
//!
//! The sixteen steps in [`bootstrap_sequence`] bring up a window, an
//! instance, a device, a swapchain and everything needed to record draw
//! commands. They run against a [`Platform`]; [`HeadlessPlatform`] is an
//! in-memory implementation with fault injection.
//!
//! # Example
//!
//! ```
//! use stagehand::bootstrap::{run_bootstrap, HeadlessPlatform};
//! use stagehand::config::BootConfig;
//! use stagehand::report::MockReporter;
//!
//! let config = BootConfig::default();
//! let platform = HeadlessPlatform::new(config.platform.clone());
//! let report = run_bootstrap(config, platform, &mut MockReporter::new()).unwrap();
//!
//! assert!(report.outcome.is_ok());
//! assert!(report.teardown.is_clean());
//! ```

pub mod codes;
pub mod context;
pub mod headless;
pub mod platform;
pub mod tasks;

pub use codes::BootstrapCode;
pub use context::{GraphicsContext, HandleField, HandleListField, Swapchain};
pub use headless::{AcquireFault, FaultPlan, HeadlessPlatform, HeadlessSettings, PlatformCall};
pub use platform::{
    DeviceInfo, Extent, Handle, Platform, PlatformError, QueueFamily, ResourceKind,
    SurfaceSupport,
};
pub use tasks::{bootstrap_sequence, placeholder_shader, DEBUG_EXTENSION, SEQUENCE_NAME};

use serde::Serialize;

use crate::config::BootConfig;
use crate::error::Result;
use crate::ledger::TeardownReport;
use crate::report::Reporter;
use crate::runner::{Lifecycle, RunPhase};
use crate::steps::{SequenceOutcome, Step};

/// Outcome of one bootstrap run and its teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub sequence: String,
    pub steps: Vec<String>,
    pub outcome: SequenceOutcome,
    pub teardown: TeardownReport,
}

impl BootstrapReport {
    /// Bootstrap code of the failing step, if the sequence failed.
    pub fn failure_code(&self) -> Option<BootstrapCode> {
        self.outcome
            .failure()
            .and_then(|f| BootstrapCode::from_code(f.code))
    }

    /// Description of the failing step, if the sequence failed.
    pub fn failed_step(&self) -> Option<&str> {
        self.outcome
            .failing_index()
            .and_then(|i| self.steps.get(i))
            .map(String::as_str)
    }

    /// Check whether the sequence completed and every release succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok() && self.teardown.is_clean()
    }
}

/// One bootstrap: the steps plus the lifecycle that owns their context.
pub struct Bootstrap<P: Platform + 'static> {
    steps: Vec<Step<'static, GraphicsContext<P>>>,
    lifecycle: Lifecycle<GraphicsContext<P>>,
}

impl<P: Platform + 'static> Bootstrap<P> {
    pub fn new(config: BootConfig, platform: P) -> Self {
        Self {
            steps: bootstrap_sequence(),
            lifecycle: Lifecycle::new(GraphicsContext::new(config, platform)),
        }
    }

    pub fn steps(&self) -> &[Step<'static, GraphicsContext<P>>] {
        &self.steps
    }

    pub fn phase(&self) -> RunPhase {
        self.lifecycle.phase()
    }

    pub fn context(&self) -> &GraphicsContext<P> {
        self.lifecycle.context()
    }

    /// Run the sequence. Resources stay alive until [`teardown`](Self::teardown).
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> Result<SequenceOutcome> {
        self.lifecycle.run(SEQUENCE_NAME, &self.steps, reporter)
    }

    /// Release everything the run created, newest first.
    pub fn teardown(&mut self, reporter: &mut dyn Reporter) -> Result<TeardownReport> {
        self.lifecycle.teardown(reporter)
    }

    /// Run the sequence and tear it down regardless of the outcome.
    pub fn run_to_teardown(&mut self, reporter: &mut dyn Reporter) -> Result<BootstrapReport> {
        let outcome = self.run(reporter)?;
        let teardown = self.teardown(reporter)?;
        Ok(BootstrapReport {
            sequence: SEQUENCE_NAME.to_string(),
            steps: self
                .steps
                .iter()
                .map(|s| s.description().to_string())
                .collect(),
            outcome,
            teardown,
        })
    }
}

/// Bootstrap `platform` with `config`, then tear everything down.
pub fn run_bootstrap<P: Platform + 'static>(
    config: BootConfig,
    platform: P,
    reporter: &mut dyn Reporter,
) -> Result<BootstrapReport> {
    Bootstrap::new(config, platform).run_to_teardown(reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MockReporter;

    fn bootstrap(faults: FaultPlan) -> Bootstrap<HeadlessPlatform> {
        let config = BootConfig::default();
        let platform = HeadlessPlatform::new(config.platform.clone()).with_faults(faults);
        Bootstrap::new(config, platform)
    }

    #[test]
    fn clean_run_leaves_nothing_alive() {
        let mut boot = bootstrap(FaultPlan::default());
        let report = boot.run_to_teardown(&mut MockReporter::new()).unwrap();

        assert!(report.is_success());
        assert_eq!(report.failure_code(), None);
        assert_eq!(boot.phase(), RunPhase::TornDown);
        assert!(boot.context().is_drained());
        assert!(boot.context().platform.live_handles().is_empty());
    }

    #[test]
    fn failure_reports_code_and_step() {
        let mut boot = bootstrap(FaultPlan {
            fail_acquire: Some(AcquireFault {
                kind: ResourceKind::Surface,
                nth: 1,
            }),
            ..Default::default()
        });
        let report = boot.run_to_teardown(&mut MockReporter::new()).unwrap();

        assert_eq!(report.failure_code(), Some(BootstrapCode::SurfaceCreation));
        assert_eq!(report.failed_step(), Some("Create surface"));
        assert!(report.teardown.is_clean());
        assert!(boot.context().platform.live_handles().is_empty());
    }

    #[test]
    fn second_run_is_rejected() {
        let mut boot = bootstrap(FaultPlan::default());
        boot.run(&mut MockReporter::new()).unwrap();
        assert!(boot.run(&mut MockReporter::new()).is_err());
        boot.teardown(&mut MockReporter::new()).unwrap();
    }

    #[test]
    fn report_serializes_outcome() {
        let config = BootConfig::default();
        let platform = HeadlessPlatform::new(config.platform.clone());
        let report = run_bootstrap(config, platform, &mut MockReporter::new()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["sequence"], SEQUENCE_NAME);
        assert_eq!(json["outcome"]["status"], "ok");
        assert_eq!(json["steps"].as_array().map(Vec::len), Some(16));
    }
}
