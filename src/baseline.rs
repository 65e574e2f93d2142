//! Pre-mutation baseline run and failure reconciliation.
//!
//! The baseline is captured once per session, before any mutation, and is
//! shared read-only across all groups. Its failing-test set is subtracted
//! from every run outcome so pre-existing flaky or broken tests are never
//! mistaken for evidence that a mutant was caught.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::test_set::TestSet;

/// Per-run timeout rule derived from baseline timing.
///
/// The budget is `base * factor + padding`; consumers treat it opaquely via
/// [`TimeoutPolicy::timeout`]. `factor` must be non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutPolicy {
    /// Baseline suite wall time.
    pub base: Duration,
    /// Multiplier applied to the baseline wall time.
    pub factor: f64,
    /// Constant slack added on top.
    pub padding: Duration,
}

impl TimeoutPolicy {
    /// Policy derived from the baseline run's wall time, with the default
    /// 1.5x factor and five seconds of padding.
    pub fn from_baseline(base: Duration) -> Self {
        Self {
            base,
            factor: 1.5,
            padding: Duration::from_secs(5),
        }
    }

    /// Override the multiplier.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Override the constant slack.
    pub fn with_padding(mut self, padding: Duration) -> Self {
        self.padding = padding;
        self
    }

    /// Effective per-run budget.
    pub fn timeout(&self) -> Duration {
        self.base.mul_f64(self.factor.max(0.0)) + self.padding
    }
}

/// The test-suite result captured once before any mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRun {
    /// Tests already failing with no mutation applied.
    pub failing_tests: TestSet,
    /// Tests the baseline executed; defines the universe size used to bound
    /// group sizing.
    pub ran_tests: TestSet,
    /// Timeout rule derived from baseline timing.
    pub timeout_policy: TimeoutPolicy,
}

impl BaselineRun {
    /// New baseline result.
    pub fn new(failing_tests: TestSet, ran_tests: TestSet, timeout_policy: TimeoutPolicy) -> Self {
        Self {
            failing_tests,
            ran_tests,
            timeout_policy,
        }
    }

    /// Size of the test universe the baseline exercised.
    pub fn total_tests(&self) -> usize {
        self.ran_tests.count()
    }

    /// Strip known-bad tests out of a failure report.
    ///
    /// Applied to each run outcome independently: a test failing even with
    /// no mutation cannot be evidence that a mutation was caught.
    pub fn reconcile_failures(&self, failed: &TestSet) -> TestSet {
        match (failed, &self.failing_tests) {
            (_, TestSet::Everything) => TestSet::empty(),
            (TestSet::Everything, TestSet::Tests(_)) => TestSet::Everything,
            (TestSet::Tests(failed), TestSet::Tests(known_bad)) => TestSet::Tests(
                failed
                    .iter()
                    .filter(|test| !known_bad.contains(test))
                    .cloned()
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline_with_failing(names: &[&str]) -> BaselineRun {
        BaselineRun::new(
            TestSet::from_names(names.iter().copied()),
            TestSet::from_names(["t1", "t2", "t3", "t4"]),
            TimeoutPolicy::from_baseline(Duration::from_secs(2)),
        )
    }

    #[test]
    fn known_bad_tests_are_stripped_from_failure_reports() {
        let baseline = baseline_with_failing(&["t5"]);
        let reported = TestSet::from_names(["t5", "t7"]);
        assert_eq!(
            baseline.reconcile_failures(&reported),
            TestSet::from_names(["t7"])
        );
    }

    #[test]
    fn reconciliation_can_erase_all_evidence() {
        let baseline = baseline_with_failing(&["t5"]);
        let reported = TestSet::from_names(["t5"]);
        assert!(baseline.reconcile_failures(&reported).is_empty());
    }

    #[test]
    fn fully_broken_baseline_yields_no_evidence() {
        let baseline = BaselineRun::new(
            TestSet::Everything,
            TestSet::from_names(["t1"]),
            TimeoutPolicy::from_baseline(Duration::from_secs(1)),
        );
        assert!(
            baseline
                .reconcile_failures(&TestSet::from_names(["t1", "t2"]))
                .is_empty()
        );
    }

    #[test]
    fn timeout_budget_scales_baseline_time() {
        let policy = TimeoutPolicy::from_baseline(Duration::from_secs(10));
        assert_eq!(policy.timeout(), Duration::from_secs(20));

        let tightened = policy
            .with_factor(2.0)
            .with_padding(Duration::from_secs(1));
        assert_eq!(tightened.timeout(), Duration::from_secs(21));
    }

    #[test]
    fn total_tests_reflects_the_ran_set() {
        let baseline = baseline_with_failing(&[]);
        assert_eq!(baseline.total_tests(), 4);
    }
}
