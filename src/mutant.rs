//! Mutant model and status lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::test_set::TestSet;

/// Stable mutant identifier assigned at generation time, immutable
/// thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MutantId(u32);

impl MutantId {
    /// Wrap a raw generation-time id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MutantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a mutant.
///
/// `NotRun` is the only state accepted by the scheduling entry point.
/// `Killed`, `Survived`, and `Timeout` are assigned by result
/// reconciliation; `NoCoverage`, `Ignored`, and `CompileError` are assigned
/// upstream and such mutants never enter execution scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutantStatus {
    /// No verdict yet.
    NotRun,
    /// A covering test failed after baseline reconciliation.
    Killed,
    /// All covering tests ran and passed.
    Survived,
    /// A covering test exceeded the timeout budget.
    Timeout,
    /// No test covers the mutated code.
    NoCoverage,
    /// Excluded by upstream policy.
    Ignored,
    /// The mutation does not compile.
    CompileError,
}

impl MutantStatus {
    /// True once a mutant has reached a verdict. Terminal states are never
    /// revisited within a scheduling pass.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotRun)
    }
}

/// One candidate code alteration tracked through the test-and-verdict
/// lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutant {
    /// Stable identity.
    pub id: MutantId,
    /// Human-readable description of the code edit.
    pub label: String,
    /// Current lifecycle status.
    pub status: MutantStatus,
    /// Tests known to execute the mutated location. Defaults to the
    /// whole-suite sentinel until the coverage phase narrows it.
    pub assessing_tests: TestSet,
}

impl Mutant {
    /// New not-yet-run mutant with sentinel coverage.
    pub fn new(id: u32, label: impl Into<String>) -> Self {
        Self {
            id: MutantId::new(id),
            label: label.into(),
            status: MutantStatus::NotRun,
            assessing_tests: TestSet::Everything,
        }
    }

    /// Set the covering tests, builder-style.
    pub fn with_assessing_tests(mut self, tests: TestSet) -> Self {
        self.assessing_tests = tests;
        self
    }
}
