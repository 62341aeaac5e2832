//! Metrics/tracing hooks (feature: `tracing`).
//!
//! This module purposefully avoids pulling heavy telemetry stacks. Events are
//! emitted through `tracing`; installing a subscriber is the caller's job.

use forkstream_core::{ForkIndex, ForkState};

use crate::dispatcher::DispatchReport;

#[cfg(feature = "tracing")]
pub fn fork_registered(key: &str, index: ForkIndex) {
    tracing::trace!(%key, index = index.get(), "fork registered");
}

#[cfg(not(feature = "tracing"))]
pub fn fork_registered(_key: &str, _index: ForkIndex) { /* no-op */
}

#[cfg(feature = "tracing")]
pub fn worker_spawned(key: &str, thread: &str) {
    tracing::debug!(%key, %thread, "fork worker spawned");
}

#[cfg(not(feature = "tracing"))]
pub fn worker_spawned(_key: &str, _thread: &str) { /* no-op */
}

#[cfg(feature = "tracing")]
pub fn worker_finished(key: &str, state: ForkState, pulled: u64, drained: bool) {
    if state == ForkState::Failed {
        tracing::warn!(%key, %state, pulled, drained, "fork worker finished");
    } else {
        tracing::debug!(%key, %state, pulled, drained, "fork worker finished");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn worker_finished(_key: &str, _state: ForkState, _pulled: u64, _drained: bool) { /* no-op */
}

#[cfg(feature = "tracing")]
pub fn dispatch_finished(report: &DispatchReport) {
    match &report.failure {
        Some(failure) => tracing::warn!(
            elements = report.elements,
            forks = report.forks,
            error = %failure,
            "dispatch stopped on source failure"
        ),
        None => tracing::debug!(
            elements = report.elements,
            forks = report.forks,
            "dispatch finished"
        ),
    }
}

#[cfg(not(feature = "tracing"))]
pub fn dispatch_finished(_report: &DispatchReport) { /* no-op */
}
