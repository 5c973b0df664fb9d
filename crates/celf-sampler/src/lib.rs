//! Monte Carlo machinery for Independent Cascade diffusion.
//!
//! [`IndependentCascade`] runs one stochastic trial over a
//! [`GraphIndex`](celf_core::GraphIndex); [`SpreadEstimator`] averages many
//! trials, in parallel when enabled, into an expected-spread estimate.

pub mod cascade;
pub mod estimator;

pub use cascade::{CascadeScratch, IndependentCascade};
pub use estimator::{SpreadEstimator, SpreadStats};
