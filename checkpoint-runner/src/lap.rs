// Copyright (c) The checkpoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lap: ordered pass/fail records for one circuit of a test suite.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// An opaque identifier for one executable test case.
///
/// Stable across runs as long as the suite is unchanged. By convention ids are
/// a file-path-like prefix followed by `::`-separated segments
/// (`tests/basic.rs::suite::case`), but nothing here interprets the contents
/// beyond equality and hashing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCaseId(SmolStr);

impl TestCaseId {
    /// Creates a new test case id.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TestCaseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TestCaseId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// The ledger classification of one finished case.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaseOutcome {
    /// The case counts as passing and need not run again.
    Passed,
    /// The case counts as failing and runs again on every subsequent lap
    /// until it passes.
    Failed,
}

/// The ledger for one suite: which cases have terminally passed and which
/// have terminally failed, in classification order.
///
/// A case id lives in at most one of the two sets at any moment. Recording a
/// new outcome supersedes whatever a previous run concluded, so a case can
/// migrate between sets across runs but never appears twice.
///
/// The serialized form is a JSON document with exactly two top-level
/// array-of-string fields, `passed` and `failed`. The field names are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    passed: IndexSet<TestCaseId>,
    failed: IndexSet<TestCaseId>,
}

impl Lap {
    /// Creates an empty lap, as seen at the first run of a suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no outcomes have been recorded.
    pub fn is_empty(&self) -> bool {
        self.passed.is_empty() && self.failed.is_empty()
    }

    /// Records the outcome for `id`, superseding any prior classification.
    pub fn record(&mut self, id: TestCaseId, outcome: CaseOutcome) {
        match outcome {
            CaseOutcome::Passed => {
                self.failed.shift_remove(&id);
                self.passed.insert(id);
            }
            CaseOutcome::Failed => {
                self.passed.shift_remove(&id);
                self.failed.insert(id);
            }
        }
    }

    /// Returns the recorded classification for `id`, if any.
    pub fn outcome_of(&self, id: &TestCaseId) -> Option<CaseOutcome> {
        if self.passed.contains(id) {
            Some(CaseOutcome::Passed)
        } else if self.failed.contains(id) {
            Some(CaseOutcome::Failed)
        } else {
            None
        }
    }

    /// Iterates over passed case ids in classification order.
    pub fn passed(&self) -> impl ExactSizeIterator<Item = &TestCaseId> + '_ {
        self.passed.iter()
    }

    /// Iterates over failed case ids in classification order.
    pub fn failed(&self) -> impl ExactSizeIterator<Item = &TestCaseId> + '_ {
        self.failed.iter()
    }
}
