use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;


/// The persisted record of completed build steps.
///
/// Serialized as `{"steps": {name: watermark, ...}}`. Each watermark is the
/// newest input modification time observed when the step last completed
/// successfully. A step with no entry has never been built.
///
/// Keys are kept in a `BTreeMap` so the document is always written sorted by
/// step name. Unknown top-level fields are ignored on load and dropped on the
/// next save.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StepLedger {
    /// Watermark per step name.
    pub steps: BTreeMap<String, Timestamp>,
}

impl StepLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the watermark recorded for `step`, or `None` if it has never
    /// completed.
    pub fn watermark(&self, step: &str) -> Option<Timestamp> {
        self.steps.get(step).copied()
    }

    /// Records `watermark` for `step`, replacing any previous value.
    ///
    /// Returns the previous watermark.
    pub fn record(&mut self, step: impl Into<String>, watermark: Timestamp) -> Option<Timestamp> {
        self.steps.insert(step.into(), watermark)
    }

    /// Removes `step` from the ledger, returning its watermark if it had one.
    pub fn remove(&mut self, step: &str) -> Option<Timestamp> {
        self.steps.remove(step)
    }

    /// Iterates over recorded steps in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Timestamp)> {
        self.steps.iter().map(|(name, ts)| (name.as_str(), *ts))
    }

    /// Returns the number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
