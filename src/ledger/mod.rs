//! Resource ledger: reverse-order teardown of acquired resources.
//!
//! The ledger records every successfully acquired resource together with the
//! action that releases it. [`ResourceLedger::release_all`] walks the entries
//! last-registered-first, so a dependent is always released before the
//! resource it was created from.
//!
//! Release actions receive the shared context, which lets them take the
//! handle out of its slot. A caller with no context uses `ResourceLedger<()>`.
//!
//! # Example
//!
//! ```
//! use stagehand::ledger::ResourceLedger;
//! use stagehand::report::MockReporter;
//!
//! let mut released = Vec::new();
//! let mut ledger = ResourceLedger::<Vec<&str>>::new();
//! ledger.register("device", "0x1", |log| { log.push("device"); Ok(()) });
//! ledger.register("swapchain", "0x2", |log| { log.push("swapchain"); Ok(()) });
//!
//! let report = ledger.release_all(&mut released, &mut MockReporter::new());
//! assert!(report.is_clean());
//! assert_eq!(released, vec!["swapchain", "device"]);
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::report::Reporter;

/// Failure reported by a release action.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("release failed with error code {code}: {message}")]
pub struct ReleaseError {
    pub code: i32,
    pub message: String,
}

impl ReleaseError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

type ReleaseAction<C> = Box<dyn FnOnce(&mut C) -> Result<(), ReleaseError>>;

struct LedgerEntry<C> {
    kind: String,
    handle: String,
    release: ReleaseAction<C>,
}

/// A resource whose release action succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasedResource {
    pub kind: String,
    pub handle: String,
}

/// A resource whose release action reported an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseFailure {
    pub kind: String,
    pub handle: String,
    pub error: ReleaseError,
}

/// Summary of one `release_all` pass, in release order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub released: Vec<ReleasedResource>,
    pub failures: Vec<ReleaseFailure>,
}

impl TeardownReport {
    /// Check whether every release action succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of release actions invoked.
    pub fn attempted(&self) -> usize {
        self.released.len() + self.failures.len()
    }
}

/// Ordered record of acquired resources and their release actions.
pub struct ResourceLedger<C> {
    entries: Vec<LedgerEntry<C>>,
}

impl<C> Default for ResourceLedger<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ResourceLedger<C> {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an acquired resource.
    ///
    /// Only call this once the acquisition has succeeded; the action will be
    /// invoked exactly once by the next [`release_all`](Self::release_all).
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        handle: impl fmt::Display,
        release: impl FnOnce(&mut C) -> Result<(), ReleaseError> + 'static,
    ) {
        let kind = kind.into();
        let handle = handle.to_string();
        tracing::trace!(kind = %kind, handle = %handle, "registered resource");
        self.entries.push(LedgerEntry {
            kind,
            handle,
            release: Box::new(release),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered resource kinds, in registration order.
    pub fn kinds(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.kind.as_str()).collect()
    }

    /// Invoke every release action once, newest first, and empty the ledger.
    ///
    /// A failing action is reported and recorded; the remaining actions still
    /// run. Calling this on an empty ledger releases nothing.
    pub fn release_all(&mut self, context: &mut C, reporter: &mut dyn Reporter) -> TeardownReport {
        let mut report = TeardownReport::default();
        if self.entries.is_empty() {
            return report;
        }

        reporter.teardown_started(self.entries.len());

        while let Some(entry) = self.entries.pop() {
            let LedgerEntry {
                kind,
                handle,
                release,
            } = entry;

            match release(context) {
                Ok(()) => {
                    reporter.resource_released(&kind, &handle);
                    report.released.push(ReleasedResource { kind, handle });
                }
                Err(error) => {
                    reporter.release_failed(&kind, &handle, &error);
                    report.failures.push(ReleaseFailure {
                        kind,
                        handle,
                        error,
                    });
                }
            }
        }

        reporter.teardown_finished(&report);
        report
    }
}

impl<C> fmt::Debug for ResourceLedger<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLedger")
            .field("entries", &self.kinds())
            .finish()
    }
}
