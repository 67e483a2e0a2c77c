// Copyright (c) The checkpoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-run disposition and post-run classification for collected cases.

use crate::config::CheckpointConfig;
use crate::errors::{CollectBehaviorParseError, LapReadError, LapWriteError};
use crate::lap::{CaseOutcome, Lap, TestCaseId};
use crate::store::LapStore;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

/// What to do with a previously-passed case at collection time.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectBehavior {
    /// Keep the case in the collected set but bypass its body, reporting it
    /// as skipped.
    Skip,

    /// Remove the case from the collected set entirely, as if it had never
    /// been discovered.
    #[default]
    Deselect,
}

impl CollectBehavior {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["skip", "deselect"]
    }
}

impl FromStr for CollectBehavior {
    type Err = CollectBehaviorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(CollectBehavior::Skip),
            "deselect" => Ok(CollectBehavior::Deselect),
            other => Err(CollectBehaviorParseError::new(other)),
        }
    }
}

impl fmt::Display for CollectBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectBehavior::Skip => write!(f, "skip"),
            CollectBehavior::Deselect => write!(f, "deselect"),
        }
    }
}

/// The decision for one collected case.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Disposition {
    /// Execute the case.
    Run,
    /// Keep the case in the executed set but bypass its body, reporting it as
    /// skipped.
    Skip,
    /// Remove the case from the executed set before execution begins.
    Deselect,
}

/// Decides whether a collected case should be executed.
///
/// Read-only with respect to the lap: failed and never-seen cases always run;
/// previously-passed cases are skipped or deselected per `behavior`.
pub fn disposition(lap: &Lap, id: &TestCaseId, behavior: CollectBehavior) -> Disposition {
    match lap.outcome_of(id) {
        Some(CaseOutcome::Passed) => match behavior {
            CollectBehavior::Skip => Disposition::Skip,
            CollectBehavior::Deselect => Disposition::Deselect,
        },
        Some(CaseOutcome::Failed) | None => Disposition::Run,
    }
}

/// Whether one phase of a case completed cleanly.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PhaseStatus {
    /// The phase completed without error.
    Passed,
    /// The phase raised an error or a failed assertion.
    Failed,
}

impl PhaseStatus {
    /// Returns true if the phase failed.
    pub fn is_failed(self) -> bool {
        matches!(self, PhaseStatus::Failed)
    }
}

/// An expect-to-fail annotation attached to a case.
///
/// A case carrying this marker is known broken; failing under it is the
/// expected, ledger-passing outcome.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ExpectFail {
    /// Whether an unexpected pass is itself recorded as a failure.
    ///
    /// Non-strict is the default: an annotated case that starts passing stays
    /// recorded as passing.
    pub strict: bool,
}

/// The raw multi-phase result the execution engine reports for one finished
/// case, fixtures included.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CaseReport {
    /// Result of fixture/setup work that ran before the body.
    pub setup: PhaseStatus,

    /// Result of the case body. `None` if setup failed before the body ran.
    pub call: Option<PhaseStatus>,

    /// Result of teardown work that ran after the body.
    pub teardown: PhaseStatus,

    /// The expect-to-fail annotation on the case, if any.
    pub expect_fail: Option<ExpectFail>,
}

impl CaseReport {
    /// Returns true if any phase failed.
    pub fn any_phase_failed(&self) -> bool {
        self.setup.is_failed()
            || self.call.is_some_and(PhaseStatus::is_failed)
            || self.teardown.is_failed()
    }

    /// Classifies this report for ledger purposes.
    ///
    /// First match wins:
    ///
    /// 1. a phase failed and no expect-to-fail annotation covers the case:
    ///    `Failed`;
    /// 2. annotated and the call failed: `Passed` (it failed as expected),
    ///    even though the host-level result for the run may be failure-like;
    /// 3. annotated and setup or teardown failed: still `Passed`, since the
    ///    annotation marks the whole case as known broken whichever phase
    ///    manifested the break;
    /// 4. no phase failed: `Passed`, unless the annotation is strict, in
    ///    which case the unexpected pass is `Failed`.
    pub fn outcome(&self) -> CaseOutcome {
        let failed = self.any_phase_failed();
        match self.expect_fail {
            None if failed => CaseOutcome::Failed,
            None => CaseOutcome::Passed,
            Some(_) if failed => CaseOutcome::Passed,
            Some(annotation) if annotation.strict => CaseOutcome::Failed,
            Some(_) => CaseOutcome::Passed,
        }
    }
}

/// Hooks the execution engine invokes at collection time, after each finished
/// case, and at run end.
///
/// This is the boundary with the host: the core depends only on this
/// interface, never on a specific runtime's extension-point API.
pub trait RunObserver {
    /// Called once collection is complete. Returns one disposition per
    /// collected id, in order. Must not mutate the lap.
    fn collection_finished(&mut self, collected: &[TestCaseId]) -> Vec<Disposition>;

    /// Called when a non-skipped case and its fixtures have finished.
    fn case_finished(&mut self, id: TestCaseId, report: &CaseReport);

    /// Called once at run end, after the last case.
    fn run_finished(&mut self) -> Result<(), LapWriteError>;
}

/// Drives checkpoint replay for one run: loads the lap, hands dispositions
/// back to the engine, classifies finished cases, and persists the lap at run
/// end.
///
/// There is no process-wide state: the instance owns the [`Lap`] from load to
/// store.
#[derive(Debug)]
pub struct CheckpointRunner {
    lap: Lap,
    behavior: CollectBehavior,
    store: LapStore,
}

impl CheckpointRunner {
    /// Loads the lap recorded by the previous run (empty on the first run).
    pub fn new(config: &CheckpointConfig) -> Result<Self, LapReadError> {
        let store = LapStore::new(config.lap_out.clone());
        let lap = store.load()?;
        Ok(Self {
            lap,
            behavior: config.collect_behavior,
            store,
        })
    }

    /// The lap as classified so far.
    pub fn lap(&self) -> &Lap {
        &self.lap
    }

    /// Persists the current lap.
    ///
    /// [`run_finished`](RunObserver::run_finished) calls this; hosts running
    /// long suites may also call it between cases so an interrupted run keeps
    /// its progress.
    pub fn flush(&self) -> Result<(), LapWriteError> {
        self.store.store(&self.lap)
    }
}

impl RunObserver for CheckpointRunner {
    fn collection_finished(&mut self, collected: &[TestCaseId]) -> Vec<Disposition> {
        collected
            .iter()
            .map(|id| disposition(&self.lap, id, self.behavior))
            .collect()
    }

    fn case_finished(&mut self, id: TestCaseId, report: &CaseReport) {
        let outcome = report.outcome();
        debug!("classified {id} as {outcome:?}");
        self.lap.record(id, outcome);
    }

    fn run_finished(&mut self) -> Result<(), LapWriteError> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn id(s: &str) -> TestCaseId {
        TestCaseId::new(s)
    }

    #[test_case(CollectBehavior::Skip, Disposition::Skip; "passed case is skipped")]
    #[test_case(CollectBehavior::Deselect, Disposition::Deselect; "passed case is deselected")]
    fn disposition_for_passed_case(behavior: CollectBehavior, expected: Disposition) {
        let mut lap = Lap::new();
        lap.record(id("t"), CaseOutcome::Passed);
        assert_eq!(disposition(&lap, &id("t"), behavior), expected);
    }

    #[test_case(CollectBehavior::Skip; "skip")]
    #[test_case(CollectBehavior::Deselect; "deselect")]
    fn failed_and_unseen_cases_always_run(behavior: CollectBehavior) {
        let mut lap = Lap::new();
        lap.record(id("t"), CaseOutcome::Failed);
        assert_eq!(disposition(&lap, &id("t"), behavior), Disposition::Run);
        assert_eq!(disposition(&lap, &id("new"), behavior), Disposition::Run);
    }

    const PASS: PhaseStatus = PhaseStatus::Passed;
    const FAIL: PhaseStatus = PhaseStatus::Failed;
    const EXPECT_FAIL: Option<ExpectFail> = Some(ExpectFail { strict: false });
    const EXPECT_FAIL_STRICT: Option<ExpectFail> = Some(ExpectFail { strict: true });

    #[test_case(PASS, Some(PASS), PASS, None, CaseOutcome::Passed; "clean pass")]
    #[test_case(PASS, Some(FAIL), PASS, None, CaseOutcome::Failed; "body failure")]
    #[test_case(FAIL, None, PASS, None, CaseOutcome::Failed; "setup failure")]
    #[test_case(PASS, Some(PASS), FAIL, None, CaseOutcome::Failed; "teardown failure after passing body")]
    #[test_case(PASS, Some(FAIL), PASS, EXPECT_FAIL, CaseOutcome::Passed; "expected body failure")]
    #[test_case(FAIL, None, PASS, EXPECT_FAIL, CaseOutcome::Passed; "expected setup failure")]
    #[test_case(PASS, Some(FAIL), FAIL, EXPECT_FAIL, CaseOutcome::Passed; "expected teardown failure")]
    #[test_case(PASS, Some(PASS), PASS, EXPECT_FAIL, CaseOutcome::Passed; "unexpected pass non-strict")]
    #[test_case(PASS, Some(PASS), PASS, EXPECT_FAIL_STRICT, CaseOutcome::Failed; "unexpected pass strict")]
    #[test_case(PASS, Some(FAIL), PASS, EXPECT_FAIL_STRICT, CaseOutcome::Passed; "expected strict body failure")]
    fn classification(
        setup: PhaseStatus,
        call: Option<PhaseStatus>,
        teardown: PhaseStatus,
        expect_fail: Option<ExpectFail>,
        expected: CaseOutcome,
    ) {
        let report = CaseReport {
            setup,
            call,
            teardown,
            expect_fail,
        };
        assert_eq!(report.outcome(), expected);
    }

    #[test]
    fn collect_behavior_from_str() {
        assert_eq!("skip".parse::<CollectBehavior>().unwrap(), CollectBehavior::Skip);
        assert_eq!(
            "deselect".parse::<CollectBehavior>().unwrap(),
            CollectBehavior::Deselect
        );
        assert_eq!(CollectBehavior::default(), CollectBehavior::Deselect);

        let error = "both".parse::<CollectBehavior>().unwrap_err();
        assert!(error.to_string().contains("skip, deselect"), "{error}");
    }
}
