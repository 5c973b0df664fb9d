//! Cost-effective influence maximization by lazy greedy selection.
//!
//! [`LazyGreedySelector`] keeps one cached marginal gain per candidate in a
//! max-priority queue, stamped with the seed-set size it was computed for.
//! Because marginal gains only shrink as the seed set grows, a fresh entry
//! at the top of the queue beats every stale entry below it and can be
//! accepted without rescanning the rest.
//!
//! - **Cardinality**: pick exactly `k` seeds, keyed by marginal gain.
//! - **Budget**: total degree-derived cost within a budget, keyed by
//!   gain per unit cost (or raw gain, see [`BudgetKey`]).
//!
//! [`NaiveGreedy`] is the full-rescan baseline and
//! [`cost_effective_forward`] runs both budget keys and keeps the better.

pub mod config;
pub mod queue;
pub mod result;
mod state;
pub mod selector;
pub mod naive;

pub use config::{BudgetKey, Constraint, RunLimits, SelectorConfig};
pub use queue::{CandidateEntry, CandidateQueue};
pub use result::{RunResult, SelectionFailure, StopReason};
pub use selector::{cost_effective_forward, cost_effective_forward_with, CostEffectiveResult, LazyGreedySelector};
pub use naive::NaiveGreedy;
