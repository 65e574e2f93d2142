//! Outward-facing mutation process sequencing and language dispatch.
//!
//! The orchestrator sequences mutate, filter, coverage, test, and restore.
//! Mutation generation, filtering, coverage analysis, and restore are
//! external steps supplied by a per-language [`MutationSteps`] strategy;
//! only the scheduling pipeline behind [`MutationProcess::test`] lives in
//! this crate.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::baseline::BaselineRun;
use crate::config::ScheduleConfig;
use crate::executor::TestExecutor;
use crate::mutant::Mutant;
use crate::report::{Reporter, ScoreSummary};
use crate::runner::{ScheduleError, ScheduleRunner};
use crate::test_set::TestSet;

/// Languages a mutation strategy can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    /// Rust projects.
    Rust,
    /// Python projects.
    Python,
    /// JavaScript projects.
    JavaScript,
    /// TypeScript projects.
    TypeScript,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
        };
        f.write_str(name)
    }
}

/// Failure surfaced by an external pipeline step.
#[derive(Debug, Error)]
#[error("mutation step failure: {0}")]
pub struct StepFailure(
    /// Underlying step error.
    #[from]
    pub Box<dyn std::error::Error + Send + Sync>,
);

impl StepFailure {
    /// Wrap any error (or message) as a step failure.
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// No strategy registered for the project's language. Fatal at
    /// orchestration start; no retry.
    #[error("no mutation strategy registered for language {0}")]
    MissingStrategy(Language),
    /// The scheduling pipeline failed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    /// An external pipeline step failed.
    #[error(transparent)]
    Step(#[from] StepFailure),
}

/// Language-specific pipeline steps, all external to this crate.
pub trait MutationSteps {
    /// Produce the collection of not-yet-run mutants.
    fn mutate(&mut self) -> Result<Vec<Mutant>, StepFailure>;

    /// Apply static exclusion policy to the generated mutants.
    fn filter_mutants(&mut self, mutants: Vec<Mutant>) -> Result<Vec<Mutant>, StepFailure>;

    /// Assign `assessing_tests` to each mutant in place. Receives the
    /// baseline's failing tests so coverage determination can itself
    /// ignore known-bad tests.
    fn get_coverage(
        &mut self,
        executor: &dyn TestExecutor,
        mutants: &mut [Mutant],
        baseline_failing: &TestSet,
    ) -> Result<(), StepFailure>;

    /// Undo mutation side effects on the project tree.
    fn restore(&mut self) -> Result<(), StepFailure>;
}

/// Constructor for a language's pipeline steps.
pub type StepsFactory = fn() -> Box<dyn MutationSteps>;

/// Static table from the closed language enumeration to strategy
/// constructors.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    factories: BTreeMap<Language, StepsFactory>,
}

impl LanguageRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the strategy for a language.
    pub fn register(&mut self, language: Language, factory: StepsFactory) -> &mut Self {
        self.factories.insert(language, factory);
        self
    }

    /// Construct the steps for a language.
    pub fn resolve(&self, language: Language) -> Result<Box<dyn MutationSteps>, ProcessError> {
        self.factories
            .get(&language)
            .map(|factory| factory())
            .ok_or(ProcessError::MissingStrategy(language))
    }
}

/// Result of a completed pass: the tested mutants and their aggregate
/// counts.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Mutants with final statuses, ordered by id.
    pub mutants: Vec<Mutant>,
    /// Per-status counts; `summary.score()` is `NaN` when nothing
    /// assessable was tested.
    pub summary: ScoreSummary,
}

impl ProcessResult {
    /// Aggregate mutation score, 0-100 or `NaN`.
    pub fn score(&self) -> f64 {
        self.summary.score()
    }
}

/// Sequences one mutation-testing session against a single project.
///
/// Owns the executor for the session and drops it once [`run`] returns,
/// releasing whatever test-process resources it held.
///
/// [`run`]: MutationProcess::run
pub struct MutationProcess<E: TestExecutor> {
    language: Language,
    baseline: BaselineRun,
    config: ScheduleConfig,
    executor: E,
}

impl<E: TestExecutor> MutationProcess<E> {
    /// New session over an already-captured baseline.
    pub fn new(
        language: Language,
        baseline: BaselineRun,
        config: ScheduleConfig,
        executor: E,
    ) -> Self {
        Self {
            language,
            baseline,
            config,
            executor,
        }
    }

    /// Run the full mutate, filter, coverage, test, restore pipeline.
    pub fn run(
        self,
        registry: &LanguageRegistry,
        reporter: Option<&dyn Reporter>,
    ) -> Result<ProcessResult, ProcessError> {
        let mut steps = registry.resolve(self.language)?;
        info!(language = %self.language, "starting mutation process");

        let mutants = steps.mutate()?;
        let mut mutants = steps.filter_mutants(mutants)?;
        steps.get_coverage(&self.executor, &mut mutants, &self.baseline.failing_tests)?;

        let result = self.test(mutants, reporter)?;
        steps.restore()?;
        Ok(result)
    }

    /// Schedule and execute an already-prepared mutant collection.
    ///
    /// An empty collection yields a `NaN` score without ever invoking the
    /// executor. Any mutant with a status other than `NotRun` is a fatal
    /// contract violation.
    pub fn test(
        &self,
        mutants: Vec<Mutant>,
        reporter: Option<&dyn Reporter>,
    ) -> Result<ProcessResult, ProcessError> {
        if mutants.is_empty() {
            info!("no mutants to test");
            return Ok(ProcessResult {
                mutants: Vec::new(),
                summary: ScoreSummary::default(),
            });
        }

        let runner = ScheduleRunner::new(&self.baseline, &self.config);
        let tested = runner.execute(mutants, &self.executor, reporter)?;
        let summary = ScoreSummary::from_mutants(&tested);
        info!(
            killed = summary.killed,
            survived = summary.survived,
            timeout = summary.timeout,
            unresolved = summary.not_run,
            score = summary.score(),
            "mutation testing pass complete"
        );
        Ok(ProcessResult {
            mutants: tested,
            summary,
        })
    }
}
