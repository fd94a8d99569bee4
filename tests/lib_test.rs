//! Library integration tests.

use stagehand::StagehandError;

#[test]
fn error_types_are_public() {
    let err = StagehandError::InvalidTransition {
        from: "torn down".into(),
        action: "run".into(),
    };
    assert_eq!(err.to_string(), "Cannot run while torn down");
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> stagehand::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use stagehand::cli::{Cli, Commands};

    let cli = Cli::parse_from(["stagehand", "steps", "--json"]);

    if let Some(Commands::Steps(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Steps command");
    }
}

#[test]
fn engine_types_are_public() {
    use stagehand::context::Slot;
    use stagehand::ledger::{ReleaseError, ResourceLedger, TeardownReport};
    use stagehand::report::{ConsoleReporter, OutputMode, StagehandTheme, TracingReporter};
    use stagehand::steps::{SequenceOutcome, StepFailure};

    let _slot: Slot<u32> = Slot::empty("x");
    let _ledger: ResourceLedger<()> = ResourceLedger::new();
    let _report = TeardownReport::default();
    let _err = ReleaseError::new(1, "x");
    let _failure = StepFailure {
        code: 1,
        message: "x".into(),
    };
    let _outcome = SequenceOutcome::Ok;
    let _tracing = TracingReporter::new();
    let _console = ConsoleReporter::new(
        OutputMode::Quiet,
        StagehandTheme::plain(),
        Vec::<u8>::new(),
        Vec::<u8>::new(),
    );
}

#[test]
fn bootstrap_runs_through_the_public_api() {
    use stagehand::bootstrap::{run_bootstrap, HeadlessPlatform};
    use stagehand::config::BootConfig;
    use stagehand::report::MockReporter;

    let config = BootConfig::default();
    let platform = HeadlessPlatform::new(config.platform.clone());
    let report = run_bootstrap(config, platform, &mut MockReporter::new()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.steps.len(), 16);
}
