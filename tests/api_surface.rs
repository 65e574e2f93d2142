use std::time::Duration;

use mutpack::{
    BaselineRun, Language, Mutant, MutantStatus, ScheduleConfig, ScoreSummary, TestSet,
    TimeoutPolicy, build_groups,
};

#[test]
fn public_surface_compiles_and_exports_core() {
    let baseline = BaselineRun::new(
        TestSet::empty(),
        TestSet::from_names(["t1", "t2"]),
        TimeoutPolicy::from_baseline(Duration::from_secs(1)),
    );
    assert_eq!(baseline.total_tests(), 2);

    let mutants = vec![
        Mutant::new(1, "flip sign").with_assessing_tests(TestSet::from_names(["t1"])),
        Mutant::new(2, "drop call").with_assessing_tests(TestSet::from_names(["t2"])),
    ];
    let groups = build_groups(mutants, baseline.total_tests(), &ScheduleConfig::default());
    assert_eq!(groups.len(), 1);

    let summary = ScoreSummary::from_mutants(groups.iter().flat_map(|g| g.mutants.iter()));
    assert_eq!(summary.not_run, 2);
    assert!(summary.score().is_nan());

    assert!(MutantStatus::Killed.is_terminal());
    assert_eq!(Language::TypeScript.to_string(), "typescript");
}
