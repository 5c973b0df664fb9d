use crate::cascade::{CascadeScratch, IndependentCascade};
use celf_core::{EdgeNoise, Error, NodeId, Result, F};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary of a batch of cascade trials.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpreadStats {
    pub trials: usize,
    pub mean: F,
    pub variance: F,
    pub std_error: F,
}

impl SpreadStats {
    fn empty(trials: usize) -> Self {
        Self { trials, mean: 0.0, variance: 0.0, std_error: 0.0 }
    }

    /// Half-width of the normal 95% confidence interval.
    pub fn ci95(&self) -> F {
        1.96 * self.std_error
    }
}

/// Expected-spread estimator: the mean activated count over independent trials.
///
/// Trial `t` under stream seed `s` always draws from
/// `EdgeNoise::from_trial_id(s, t)`, so an estimate is a pure function of
/// `(seeds, trials, s)` regardless of how trials are scheduled on threads.
#[derive(Clone, Copy, Debug)]
pub struct SpreadEstimator<'g> {
    cascade: IndependentCascade<'g>,
    parallel: bool,
}

impl<'g> SpreadEstimator<'g> {
    pub fn new(cascade: IndependentCascade<'g>) -> Self {
        Self { cascade, parallel: true }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn cascade(&self) -> &IndependentCascade<'g> {
        &self.cascade
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Mean activated count over `trials` trials. An empty seed set is 0.0
    /// without simulating.
    pub fn estimate(&self, seeds: &[NodeId], trials: usize, stream_seed: u64) -> Result<F> {
        check_trials(trials)?;
        if seeds.is_empty() {
            return Ok(0.0);
        }
        self.cascade.validate_seeds(seeds)?;

        let (total, _) = self.accumulate(seeds, trials, stream_seed);
        let mean = total as F / trials as F;
        tracing::trace!(seeds = seeds.len(), trials, mean, "spread estimate");
        Ok(mean)
    }

    /// Mean plus sample variance and standard error of the mean.
    pub fn estimate_stats(
        &self,
        seeds: &[NodeId],
        trials: usize,
        stream_seed: u64,
    ) -> Result<SpreadStats> {
        check_trials(trials)?;
        if seeds.is_empty() {
            return Ok(SpreadStats::empty(trials));
        }
        self.cascade.validate_seeds(seeds)?;

        let (total, total_sq) = self.accumulate(seeds, trials, stream_seed);
        let n = trials as u128;
        let mean = total as F / trials as F;
        let variance = if trials > 1 {
            // Exact integer numerator: n * sum(x^2) - (sum x)^2
            let numerator = n * total_sq - total * total;
            numerator as F / (n * (n - 1)) as F
        } else {
            0.0
        };

        Ok(SpreadStats {
            trials,
            mean,
            variance,
            std_error: (variance / trials as F).sqrt(),
        })
    }

    fn accumulate(&self, seeds: &[NodeId], trials: usize, stream_seed: u64) -> (u128, u128) {
        let n = self.cascade.graph().num_nodes();
        let trial = |scratch: &mut CascadeScratch, t: usize| {
            let mut noise = EdgeNoise::from_trial_id(stream_seed, t as u64);
            let count = self.cascade.run_trial(seeds, &mut noise, scratch) as u128;
            (count, count * count)
        };

        if self.parallel && trials > 1 {
            (0..trials)
                .into_par_iter()
                .map_init(|| CascadeScratch::new(n), trial)
                .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
        } else {
            let mut scratch = CascadeScratch::new(n);
            (0..trials)
                .map(|t| trial(&mut scratch, t))
                .fold((0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
        }
    }
}

fn check_trials(trials: usize) -> Result<()> {
    if trials == 0 {
        return Err(Error::config("trial count must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use celf_core::GraphIndex;

    fn star() -> GraphIndex {
        GraphIndex::build(&[(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap()
    }

    #[test]
    fn test_certain_star_spread() {
        let g = star();
        let est = SpreadEstimator::new(IndependentCascade::new(&g, 1.0).unwrap());
        assert_relative_eq!(est.estimate(&[0], 1, 0).unwrap(), 5.0);
        assert_relative_eq!(est.estimate(&[3], 10, 0).unwrap(), 5.0);
    }

    #[test]
    fn test_empty_seeds_and_zero_trials() {
        let g = star();
        let est = SpreadEstimator::new(IndependentCascade::new(&g, 0.5).unwrap());
        assert_eq!(est.estimate(&[], 10, 0).unwrap(), 0.0);
        assert!(matches!(est.estimate(&[0], 0, 0), Err(Error::Configuration(_))));
        assert!(matches!(est.estimate(&[7], 5, 0), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let g = GraphIndex::build(&[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3), (3, 4), (4, 5)]).unwrap();
        let ic = IndependentCascade::new(&g, 0.3).unwrap();
        let par = SpreadEstimator::new(ic);
        let seq = SpreadEstimator::new(ic).with_parallel(false);
        assert_eq!(par.estimate(&[0], 500, 17).unwrap(), seq.estimate(&[0], 500, 17).unwrap());
        assert_eq!(
            par.estimate_stats(&[0, 5], 300, 3).unwrap(),
            seq.estimate_stats(&[0, 5], 300, 3).unwrap()
        );
    }

    #[test]
    fn test_stats_on_certain_cascade() {
        let g = star();
        let est = SpreadEstimator::new(IndependentCascade::new(&g, 1.0).unwrap());
        let stats = est.estimate_stats(&[1], 40, 0).unwrap();
        assert_eq!(stats.trials, 40);
        assert_relative_eq!(stats.mean, 5.0);
        assert_relative_eq!(stats.variance, 0.0);
        assert_relative_eq!(stats.ci95(), 0.0);
    }
}
