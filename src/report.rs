//! Reporter seam and aggregate score summary.

use serde::Serialize;

use crate::mutant::{Mutant, MutantStatus};

/// Receives at-most-one notification per mutant per session, as soon as the
/// mutant reaches a terminal status.
///
/// Fire-and-forget: the coordinator ignores whatever the reporter does with
/// the notification. `Sync` because notifications arrive from parallel
/// worker slots.
pub trait Reporter: Sync {
    /// A mutant reached a terminal status.
    fn on_mutant_tested(&self, mutant: &Mutant);
}

/// Per-status counts over a mutant collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    /// Total mutants counted.
    pub total: usize,
    /// Killed mutants.
    pub killed: usize,
    /// Survived mutants.
    pub survived: usize,
    /// Timed-out mutants.
    pub timeout: usize,
    /// Mutants no test covers.
    pub no_coverage: usize,
    /// Mutants excluded by upstream policy.
    pub ignored: usize,
    /// Mutants that do not compile.
    pub compile_error: usize,
    /// Mutants that ended the pass without a verdict.
    pub not_run: usize,
}

impl ScoreSummary {
    /// Count statuses over a mutant collection.
    pub fn from_mutants<'a, I>(mutants: I) -> Self
    where
        I: IntoIterator<Item = &'a Mutant>,
    {
        let mut summary = Self::default();
        for mutant in mutants {
            summary.total += 1;
            match mutant.status {
                MutantStatus::Killed => summary.killed += 1,
                MutantStatus::Survived => summary.survived += 1,
                MutantStatus::Timeout => summary.timeout += 1,
                MutantStatus::NoCoverage => summary.no_coverage += 1,
                MutantStatus::Ignored => summary.ignored += 1,
                MutantStatus::CompileError => summary.compile_error += 1,
                MutantStatus::NotRun => summary.not_run += 1,
            }
        }
        summary
    }

    /// Mutation score as a 0-100 percentage: detected (killed + timeout)
    /// over detected + undetected (survived + no-coverage).
    ///
    /// `NaN` when nothing assessable was counted, including the empty
    /// collection. Ignored, compile-error, and unresolved mutants carry no
    /// evidence about test-suite strength and stay out of the ratio.
    pub fn score(&self) -> f64 {
        let detected = self.killed + self.timeout;
        let undetected = self.survived + self.no_coverage;
        let assessable = detected + undetected;
        if assessable == 0 {
            return f64::NAN;
        }
        detected as f64 * 100.0 / assessable as f64
    }

    /// Render as a JSON object for embedding in host reports.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("score summary should serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutant::Mutant;

    fn with_status(id: u32, status: MutantStatus) -> Mutant {
        let mut mutant = Mutant::new(id, format!("m{id}"));
        mutant.status = status;
        mutant
    }

    #[test]
    fn counts_every_status_bucket() {
        let mutants = vec![
            with_status(1, MutantStatus::Killed),
            with_status(2, MutantStatus::Killed),
            with_status(3, MutantStatus::Survived),
            with_status(4, MutantStatus::Timeout),
            with_status(5, MutantStatus::NoCoverage),
            with_status(6, MutantStatus::Ignored),
            with_status(7, MutantStatus::CompileError),
            with_status(8, MutantStatus::NotRun),
        ];
        let summary = ScoreSummary::from_mutants(&mutants);

        assert_eq!(summary.total, 8);
        assert_eq!(summary.killed, 2);
        assert_eq!(summary.survived, 1);
        assert_eq!(summary.timeout, 1);
        assert_eq!(summary.no_coverage, 1);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.compile_error, 1);
        assert_eq!(summary.not_run, 1);
    }

    #[test]
    fn score_is_detected_over_assessable() {
        let mutants = vec![
            with_status(1, MutantStatus::Killed),
            with_status(2, MutantStatus::Timeout),
            with_status(3, MutantStatus::Survived),
            with_status(4, MutantStatus::NoCoverage),
        ];
        let summary = ScoreSummary::from_mutants(&mutants);
        assert_eq!(summary.score(), 50.0);
    }

    #[test]
    fn empty_and_unassessable_collections_score_nan() {
        let none: Vec<Mutant> = Vec::new();
        assert!(ScoreSummary::from_mutants(&none).score().is_nan());

        let only_ignored = vec![
            with_status(1, MutantStatus::Ignored),
            with_status(2, MutantStatus::CompileError),
        ];
        assert!(ScoreSummary::from_mutants(&only_ignored).score().is_nan());
    }

    #[test]
    fn json_rendering_includes_counts() {
        let summary = ScoreSummary::from_mutants(&[with_status(1, MutantStatus::Killed)]);
        let json = summary.to_json();
        assert!(json.contains("\"killed\": 1"));
    }
}
