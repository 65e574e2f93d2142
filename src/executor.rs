//! External test-executor seam.
//!
//! The executor owns test-process lifecycle; this crate only hands it a
//! group, a timeout rule, and a callback for incremental outcomes. Each
//! outcome is answered with an explicit [`RunControl`] decision, which is
//! how the coordinator bails out of runs whose mutants are all decided.

use thiserror::Error;

use crate::baseline::TimeoutPolicy;
use crate::group::MutantGroup;
use crate::mutant::MutantId;
use crate::test_set::TestSet;

/// Incremental result emitted by the executor during one group's run.
///
/// Multiple outcomes may be emitted per group before the run concludes.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The mutants this outcome speaks for.
    pub mutants: Vec<MutantId>,
    /// Tests that failed, before baseline reconciliation.
    pub failed_tests: TestSet,
    /// Tests that ran to completion.
    pub ran_tests: TestSet,
    /// Tests that exceeded the timeout budget.
    pub timed_out_tests: TestSet,
}

/// Coordinator's answer to an incremental outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunControl {
    /// Keep running the group's remaining planned tests.
    Continue,
    /// Stop early; every mutant in the group has a verdict.
    Stop,
}

/// Failure surfaced by an executor. Propagated out of the scheduling core
/// unretried; sandboxing executor crashes is not this crate's job.
#[derive(Debug, Error)]
#[error("test executor failure: {0}")]
pub struct ExecutorFailure(
    /// Underlying executor error.
    #[from]
    pub Box<dyn std::error::Error + Send + Sync>,
);

impl ExecutorFailure {
    /// Wrap any error (or message) as an executor failure.
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Runs a group's covering tests against its mutants.
///
/// Implementations invoke `on_outcome` zero or more times as results come
/// in and must honor a [`RunControl::Stop`] answer by ending the run early.
/// `Sync` because groups are dispatched from parallel worker slots.
pub trait TestExecutor: Sync {
    /// Execute the tests relevant to `group` under `timeout`.
    fn run(
        &self,
        group: &MutantGroup,
        timeout: &TimeoutPolicy,
        on_outcome: &mut dyn FnMut(RunOutcome) -> RunControl,
    ) -> Result<(), ExecutorFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_wrap_arbitrary_errors() {
        let failure = ExecutorFailure::new("runner process crashed");
        assert!(failure.to_string().contains("runner process crashed"));

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let failure = ExecutorFailure::new(io);
        assert!(failure.to_string().contains("pipe closed"));
    }
}
