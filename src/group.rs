//! Coverage-aware mutant grouping.
//!
//! Partitions not-yet-run mutants into execution groups, merging mutants
//! whose covering test sets are disjoint so one physical test-suite
//! execution can assess several mutants. Running fewer, larger groups is
//! the optimization goal; disjointness keeps failure attribution
//! unambiguous.

use tracing::debug;

use crate::config::ScheduleConfig;
use crate::mutant::Mutant;
use crate::test_set::TestSet;

/// Mutants selected to run together in a single physical test execution.
///
/// Transient: exists only for the duration of one dispatch. Each mutant
/// belongs to exactly one group.
#[derive(Debug, Clone)]
pub struct MutantGroup {
    /// Members, in selection order.
    pub mutants: Vec<Mutant>,
    /// Union of the members' covering tests.
    pub used_tests: TestSet,
}

impl MutantGroup {
    fn singleton(mutant: Mutant) -> Self {
        let used_tests = mutant.assessing_tests.clone();
        Self {
            mutants: vec![mutant],
            used_tests,
        }
    }
}

/// Partition `mutants` into execution groups.
///
/// Mutants with sentinel coverage are emitted first as singleton groups:
/// sharing a run with them would make any failure ambiguous. The rest are
/// packed greedily, fewest covering tests first, under two constraints: a
/// candidate never overlaps the group's used tests, and the group never
/// needs more distinct tests than `total_tests`, the baseline universe
/// size. The bound is a guard against pathological grouping overhead, not
/// a correctness requirement.
///
/// When mixing or coverage-based optimization is disabled every mutant is
/// its own group.
pub fn build_groups(
    mutants: Vec<Mutant>,
    total_tests: usize,
    config: &ScheduleConfig,
) -> Vec<MutantGroup> {
    if !config.mix_mutants || !config.coverage_analysis {
        debug!(
            mutants = mutants.len(),
            "test-mixing disabled; scheduling singleton groups"
        );
        return mutants.into_iter().map(MutantGroup::singleton).collect();
    }

    let mut groups = Vec::new();
    let mut remaining = Vec::with_capacity(mutants.len());
    for mutant in mutants {
        if mutant.assessing_tests.is_everything() {
            groups.push(MutantGroup::singleton(mutant));
        } else {
            remaining.push(mutant);
        }
    }

    // Fewest covering tests first: many tightly-packed groups form before
    // large coverage sets dominate the test-count budget. The sort is
    // stable, so equal counts keep generation order.
    remaining.sort_by_key(|mutant| mutant.assessing_tests.count());

    while !remaining.is_empty() {
        let seed = remaining.remove(0);
        let mut used_tests = seed.assessing_tests.clone();
        let mut members = vec![seed];

        let mut index = 0;
        while index < remaining.len() {
            let candidate = &remaining[index].assessing_tests;
            let oversized = used_tests.count().saturating_add(candidate.count()) > total_tests;
            if oversized || candidate.contains_any(&used_tests) {
                index += 1;
                continue;
            }
            let joined = remaining.remove(index);
            used_tests = used_tests.merge(&joined.assessing_tests);
            members.push(joined);
        }

        groups.push(MutantGroup {
            mutants: members,
            used_tests,
        });
    }

    debug!(groups = groups.len(), "built mutant groups");
    groups
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_set::TestId;

    fn mutant(id: u32, tests: &[&str]) -> Mutant {
        Mutant::new(id, format!("m{id}"))
            .with_assessing_tests(TestSet::from_names(tests.iter().copied()))
    }

    fn ids(group: &MutantGroup) -> Vec<u32> {
        group.mutants.iter().map(|m| m.id.get()).collect()
    }

    #[test]
    fn packs_disjoint_coverage_and_splits_overlap() {
        // Baseline of 4 tests; M1 covers {A,B}, M2 covers {C}, M3 covers {A}.
        let mutants = vec![
            mutant(1, &["A", "B"]),
            mutant(2, &["C"]),
            mutant(3, &["A"]),
        ];
        let groups = build_groups(mutants, 4, &ScheduleConfig::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), vec![2, 3]);
        assert_eq!(ids(&groups[1]), vec![1]);
        assert_eq!(groups[0].used_tests, TestSet::from_names(["A", "C"]));
    }

    #[test]
    fn sentinel_coverage_is_always_scheduled_alone() {
        let mutants = vec![
            Mutant::new(1, "untraceable"),
            mutant(2, &["A"]),
            mutant(3, &["B"]),
        ];
        let groups = build_groups(mutants, 4, &ScheduleConfig::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), vec![1]);
        assert!(groups[0].used_tests.is_everything());
        assert_eq!(ids(&groups[1]), vec![2, 3]);
    }

    #[test]
    fn size_bound_blocks_candidates_past_the_baseline_total() {
        let mutants = vec![
            mutant(1, &["A"]),
            mutant(2, &["B"]),
            mutant(3, &["C"]),
        ];
        // Universe of two tests: the third disjoint mutant must overflow
        // into a second group.
        let groups = build_groups(mutants, 2, &ScheduleConfig::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), vec![1, 2]);
        assert_eq!(ids(&groups[1]), vec![3]);
    }

    #[test]
    fn disabling_mixing_or_coverage_forces_singletons() {
        for config in [
            ScheduleConfig::default().with_mix_mutants(false),
            ScheduleConfig::default().with_coverage_analysis(false),
        ] {
            let mutants = vec![mutant(1, &["A"]), mutant(2, &["B"]), mutant(3, &["C"])];
            let groups = build_groups(mutants, 10, &config);
            assert_eq!(groups.len(), 3);
            assert!(groups.iter().all(|g| g.mutants.len() == 1));
        }
    }

    const UNIVERSE: usize = 12;

    fn arb_mutants() -> impl Strategy<Value = Vec<Mutant>> {
        prop::collection::vec(prop::collection::btree_set(0..UNIVERSE as u32, 1..5), 0..10)
            .prop_map(|coverages| {
                coverages
                    .into_iter()
                    .enumerate()
                    .map(|(id, tests)| {
                        Mutant::new(id as u32, format!("m{id}")).with_assessing_tests(
                            tests
                                .into_iter()
                                .map(|t| TestId::new(format!("t{t}")))
                                .collect(),
                        )
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn grouping_never_merges_overlapping_coverage(mutants in arb_mutants()) {
            let groups = build_groups(mutants, UNIVERSE, &ScheduleConfig::default());
            for group in &groups {
                for (i, a) in group.mutants.iter().enumerate() {
                    for b in &group.mutants[i + 1..] {
                        prop_assert!(!a.assessing_tests.contains_any(&b.assessing_tests));
                    }
                }
            }
        }

        #[test]
        fn groups_stay_within_the_baseline_test_budget(mutants in arb_mutants()) {
            let groups = build_groups(mutants, UNIVERSE, &ScheduleConfig::default());
            for group in &groups {
                prop_assert!(group.used_tests.count() <= UNIVERSE);
            }
        }

        #[test]
        fn every_mutant_lands_in_exactly_one_group(mutants in arb_mutants()) {
            let expected: Vec<u32> = {
                let mut all: Vec<u32> = mutants.iter().map(|m| m.id.get()).collect();
                all.sort_unstable();
                all
            };
            let groups = build_groups(mutants, UNIVERSE, &ScheduleConfig::default());
            let mut seen: Vec<u32> = groups
                .iter()
                .flat_map(|g| g.mutants.iter().map(|m| m.id.get()))
                .collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, expected);
        }
    }
}
