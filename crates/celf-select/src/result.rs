use celf_core::{Error, NodeId, F};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `k` seeds selected, or the budget admits nothing more.
    Satisfied,
    /// No candidates left.
    Exhausted,
    TrialLimit,
    TimeLimit,
}

/// Seeds in selection order with cumulative spread and cost.
///
/// Handed to observers after every acceptance (`stop == None`) and returned
/// at termination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub seeds: Vec<NodeId>,
    pub spread: F,
    /// Budget mode only.
    pub cost: Option<F>,
    /// Cached marginal gain of each seed when it was accepted.
    pub gains: Vec<F>,
    pub evaluations: u64,
    pub trials: u64,
    pub stop: Option<StopReason>,
}

impl RunResult {
    pub fn empty() -> Self {
        Self {
            seeds: Vec::new(),
            spread: 0.0,
            cost: None,
            gains: Vec::new(),
            evaluations: 0,
            trials: 0,
            stop: None,
        }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

/// A failed run together with whatever it had selected before failing.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("selection stopped after {} seeds: {error}", .partial.seeds.len())]
pub struct SelectionFailure {
    pub partial: RunResult,
    #[source]
    pub error: Error,
}

impl From<Error> for SelectionFailure {
    fn from(error: Error) -> Self {
        Self { partial: RunResult::empty(), error }
    }
}
