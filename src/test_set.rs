//! Test identifiers and coverage sets.
//!
//! A [`TestSet`] is either an explicit set of test identifiers or the
//! `Everything` sentinel for mutants whose effect cannot be traced to
//! specific tests. All grouping decisions are built on these two value
//! operations: `merge` (union, sentinel-absorbing) and `contains_any`
//! (non-empty intersection).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, comparable identifier for one test case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TestId(String);

impl TestId {
    /// Wrap a raw test name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Raw test name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The tests covering a mutant, or the whole-suite sentinel.
///
/// Sentinel sets never participate in merge grouping; the grouping engine
/// always schedules them alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSet {
    /// Coverage could not be traced to specific tests; the mutant must be
    /// assessed against the entire suite.
    Everything,
    /// Explicit, order-irrelevant set of covering tests.
    Tests(BTreeSet<TestId>),
}

impl TestSet {
    /// Empty explicit set.
    pub fn empty() -> Self {
        Self::Tests(BTreeSet::new())
    }

    /// Explicit set built from raw test names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tests(names.into_iter().map(TestId::new).collect())
    }

    /// True for the whole-suite sentinel.
    pub fn is_everything(&self) -> bool {
        matches!(self, Self::Everything)
    }

    /// True when no test is covered. The sentinel is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Everything => false,
            Self::Tests(tests) => tests.is_empty(),
        }
    }

    /// Number of covered tests. The sentinel counts as larger than any
    /// finite bound.
    pub fn count(&self) -> usize {
        match self {
            Self::Everything => usize::MAX,
            Self::Tests(tests) => tests.len(),
        }
    }

    /// True when `test` is covered.
    pub fn contains(&self, test: &TestId) -> bool {
        match self {
            Self::Everything => true,
            Self::Tests(tests) => tests.contains(test),
        }
    }

    /// Symmetric non-empty intersection test.
    pub fn contains_any(&self, other: &TestSet) -> bool {
        match (self, other) {
            (Self::Everything, Self::Everything) => true,
            (Self::Everything, Self::Tests(tests)) | (Self::Tests(tests), Self::Everything) => {
                !tests.is_empty()
            }
            (Self::Tests(a), Self::Tests(b)) => {
                let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
                small.iter().any(|test| large.contains(test))
            }
        }
    }

    /// Set union. Merging with the sentinel yields the sentinel.
    pub fn merge(&self, other: &TestSet) -> TestSet {
        match (self, other) {
            (Self::Everything, _) | (_, Self::Everything) => Self::Everything,
            (Self::Tests(a), Self::Tests(b)) => Self::Tests(a.union(b).cloned().collect()),
        }
    }
}

impl FromIterator<TestId> for TestSet {
    fn from_iter<I: IntoIterator<Item = TestId>>(iter: I) -> Self {
        Self::Tests(iter.into_iter().collect())
    }
}
