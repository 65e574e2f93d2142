//! Scheduling configuration.

use serde::{Deserialize, Serialize};

/// Knobs controlling grouping, concurrency, and early-exit behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Maximum number of groups executing at once.
    pub concurrency: usize,
    /// Merge mutants with disjoint coverage into shared runs. When false,
    /// every mutant runs in its own group.
    pub mix_mutants: bool,
    /// Use per-test coverage when grouping. When false, grouping degrades
    /// to per-mutant isolation and attribution never depends on coverage
    /// data.
    pub coverage_analysis: bool,
    /// Stop a group's remaining planned tests once every mutant in it has a
    /// verdict. When false, the full planned subset always runs.
    pub bail: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            concurrency,
            mix_mutants: true,
            coverage_analysis: true,
            bail: true,
        }
    }
}

impl ScheduleConfig {
    /// Set the concurrency budget (clamped to at least one worker).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Enable or disable test-mixing.
    pub fn with_mix_mutants(mut self, mix_mutants: bool) -> Self {
        self.mix_mutants = mix_mutants;
        self
    }

    /// Enable or disable coverage-based grouping.
    pub fn with_coverage_analysis(mut self, coverage_analysis: bool) -> Self {
        self.coverage_analysis = coverage_analysis;
        self
    }

    /// Enable or disable early exit for decided groups.
    pub fn with_bail(mut self, bail: bool) -> Self {
        self.bail = bail;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_builder_overrides_work() {
        let default = ScheduleConfig::default();
        assert!(default.concurrency >= 1);
        assert!(default.mix_mutants);
        assert!(default.coverage_analysis);
        assert!(default.bail);

        let cfg = ScheduleConfig::default()
            .with_concurrency(0)
            .with_mix_mutants(false)
            .with_coverage_analysis(false)
            .with_bail(false);

        assert_eq!(cfg.concurrency, 1);
        assert!(!cfg.mix_mutants);
        assert!(!cfg.coverage_analysis);
        assert!(!cfg.bail);
    }
}
