//! Parallel group execution, result reconciliation, and the reporting gate.
//!
//! Groups run in worker slots bounded by the configured concurrency. Each
//! group is owned by exactly one worker; the baseline is shared read-only;
//! reconciliation state is group-local. A kill decision in one group never
//! stops another group's run.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::baseline::BaselineRun;
use crate::config::ScheduleConfig;
use crate::executor::{ExecutorFailure, RunControl, RunOutcome, TestExecutor};
use crate::group::{MutantGroup, build_groups};
use crate::mutant::{Mutant, MutantId, MutantStatus};
use crate::report::Reporter;
use crate::test_set::TestSet;

/// Errors raised by the execution pipeline.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A mutant entered scheduling with a status other than `NotRun`. This
    /// is a programming-contract violation in the caller; the session
    /// aborts without retry.
    #[error("mutant {id} entered scheduling with status {status:?}; only not-run mutants can be tested")]
    ContractViolation {
        /// Offending mutant.
        id: MutantId,
        /// Its status at entry.
        status: MutantStatus,
    },
    /// The executor failed. Not retried or sandboxed here.
    #[error(transparent)]
    Executor(#[from] ExecutorFailure),
}

/// Schedules mutant groups and drives each mutant to a verdict.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleRunner<'a> {
    baseline: &'a BaselineRun,
    config: &'a ScheduleConfig,
}

impl<'a> ScheduleRunner<'a> {
    /// Runner over a shared baseline and configuration.
    pub fn new(baseline: &'a BaselineRun, config: &'a ScheduleConfig) -> Self {
        Self { baseline, config }
    }

    /// Group `mutants`, execute every group under the concurrency budget,
    /// and return the collection with final statuses, ordered by id.
    ///
    /// Mutants whose covering tests never all report in stay `NotRun`; they
    /// are warned about once and not retried within this pass.
    pub fn execute(
        &self,
        mutants: Vec<Mutant>,
        executor: &dyn TestExecutor,
        reporter: Option<&dyn Reporter>,
    ) -> Result<Vec<Mutant>, ScheduleError> {
        for mutant in &mutants {
            if mutant.status != MutantStatus::NotRun {
                return Err(ScheduleError::ContractViolation {
                    id: mutant.id,
                    status: mutant.status,
                });
            }
        }

        let groups = build_groups(mutants, self.baseline.total_tests(), self.config);
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.config.concurrency.max(1).min(groups.len());
        info!(
            groups = groups.len(),
            workers, "dispatching mutant groups"
        );

        let queue = Mutex::new(VecDeque::from(groups));
        let tested: Mutex<Vec<Mutant>> = Mutex::new(Vec::new());
        let failure: Mutex<Option<ScheduleError>> = Mutex::new(None);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    loop {
                        let next = queue
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .pop_front();
                        let Some(group) = next else { break };

                        match self.run_group(group, executor, reporter) {
                            Ok(mut finished) => tested
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .append(&mut finished),
                            Err(err) => {
                                failure
                                    .lock()
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .get_or_insert(err);
                                break;
                            }
                        }
                    }
                });
            }
        });

        if let Some(err) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
            return Err(err);
        }

        let mut tested = tested.into_inner().unwrap_or_else(PoisonError::into_inner);
        tested.sort_by_key(|mutant| mutant.id);
        Ok(tested)
    }

    /// Run one group to completion (or bail-out) and apply the verdicts.
    fn run_group(
        &self,
        mut group: MutantGroup,
        executor: &dyn TestExecutor,
        reporter: Option<&dyn Reporter>,
    ) -> Result<Vec<Mutant>, ScheduleError> {
        debug!(mutants = group.mutants.len(), "running group");

        let verdicts = {
            let mut state = GroupRun::new(&group, self.baseline, self.config.bail);
            let mut on_outcome = |outcome: RunOutcome| state.absorb(outcome, reporter);
            executor.run(&group, &self.baseline.timeout_policy, &mut on_outcome)?;
            state.verdicts
        };

        for mutant in &mut group.mutants {
            match verdicts.get(&mutant.id) {
                Some(status) => mutant.status = *status,
                None => warn!(
                    mutant = %mutant.id,
                    label = %mutant.label,
                    "mutant not fully tested in its run; leaving unresolved"
                ),
            }
        }

        Ok(group.mutants)
    }
}

/// Group-local reconciliation state: accumulated evidence, verdicts, and
/// the reporting-dedup set. Owned exclusively by the worker handling the
/// group.
struct GroupRun<'g> {
    group: &'g MutantGroup,
    baseline: &'g BaselineRun,
    bail: bool,
    failed: TestSet,
    ran: TestSet,
    timed_out: TestSet,
    verdicts: BTreeMap<MutantId, MutantStatus>,
    reported: BTreeSet<MutantId>,
}

impl<'g> GroupRun<'g> {
    fn new(group: &'g MutantGroup, baseline: &'g BaselineRun, bail: bool) -> Self {
        Self {
            group,
            baseline,
            bail,
            failed: TestSet::empty(),
            ran: TestSet::empty(),
            timed_out: TestSet::empty(),
            verdicts: BTreeMap::new(),
            reported: BTreeSet::new(),
        }
    }

    /// Fold one incremental outcome into the group state and answer the
    /// executor's continuation question.
    fn absorb(&mut self, outcome: RunOutcome, reporter: Option<&dyn Reporter>) -> RunControl {
        let clean_failed = self.baseline.reconcile_failures(&outcome.failed_tests);
        self.failed = self.failed.merge(&clean_failed);
        self.ran = self.ran.merge(&outcome.ran_tests);
        self.timed_out = self.timed_out.merge(&outcome.timed_out_tests);

        let group = self.group;
        for mutant in &group.mutants {
            if !outcome.mutants.contains(&mutant.id) || self.verdicts.contains_key(&mutant.id) {
                continue;
            }
            if let Some(status) = self.assess(mutant) {
                self.verdicts.insert(mutant.id, status);
                self.report(mutant, status, reporter);
            }
        }

        if !self.bail {
            return RunControl::Continue;
        }
        let all_decided = group
            .mutants
            .iter()
            .all(|mutant| self.verdicts.contains_key(&mutant.id));
        if all_decided {
            RunControl::Stop
        } else {
            RunControl::Continue
        }
    }

    /// Verdict for one mutant under the accumulated evidence. Timeout
    /// evidence outranks failure evidence, which outranks "no evidence
    /// yet": `None` means the mutant's covering tests have not all
    /// reported in.
    fn assess(&self, mutant: &Mutant) -> Option<MutantStatus> {
        let tests = &mutant.assessing_tests;
        if tests.contains_any(&self.timed_out) {
            return Some(MutantStatus::Timeout);
        }
        if tests.contains_any(&self.failed) {
            return Some(MutantStatus::Killed);
        }

        let all_ran = match tests {
            // Sentinel coverage survives only once the whole baseline
            // universe has demonstrably run.
            TestSet::Everything => self.ran.count() >= self.baseline.total_tests(),
            TestSet::Tests(tests) => tests.iter().all(|test| self.ran.contains(test)),
        };
        all_ran.then_some(MutantStatus::Survived)
    }

    /// At-most-one notification per mutant; nothing is reported without a
    /// verdict.
    fn report(&mut self, mutant: &Mutant, status: MutantStatus, reporter: Option<&dyn Reporter>) {
        if !self.reported.insert(mutant.id) {
            return;
        }
        if let Some(reporter) = reporter {
            let mut tested = mutant.clone();
            tested.status = status;
            reporter.on_mutant_tested(&tested);
        }
    }
}
