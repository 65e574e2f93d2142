//! # mutpack
//!
//! Coverage-aware mutant batching, parallel test scheduling, and result
//! reconciliation for mutation testing. `mutpack` decides which mutants
//! share a physical test-suite execution, dispatches those runs under a
//! concurrency budget, reconciles incremental results against a
//! pre-mutation baseline, and drives every mutant to a verdict:
//! - `test_set`: test identifiers and coverage sets
//! - `mutant`: mutant model and status lifecycle
//! - `baseline`: pre-mutation run and failure reconciliation
//! - `group`: disjoint-coverage batching
//! - `runner`: parallel execution and the reporting gate
//! - `process`: pipeline sequencing and language dispatch
//!
//! Mutation generation, coverage measurement, and test-process management
//! are external collaborators behind the `MutationSteps`, `TestExecutor`,
//! and `Reporter` seams.

#![warn(missing_docs)]

pub mod baseline;
pub mod config;
pub mod executor;
pub mod group;
pub mod mutant;
pub mod process;
pub mod report;
pub mod runner;
pub mod test_set;

pub use baseline::{BaselineRun, TimeoutPolicy};
pub use config::ScheduleConfig;
pub use executor::{ExecutorFailure, RunControl, RunOutcome, TestExecutor};
pub use group::{MutantGroup, build_groups};
pub use mutant::{Mutant, MutantId, MutantStatus};
pub use process::{
    Language, LanguageRegistry, MutationProcess, MutationSteps, ProcessError, ProcessResult,
    StepFailure, StepsFactory,
};
pub use report::{Reporter, ScoreSummary};
pub use runner::{ScheduleError, ScheduleRunner};
pub use test_set::{TestId, TestSet};
