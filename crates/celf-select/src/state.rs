use crate::config::{RunLimits, SelectorConfig};
use crate::result::{RunResult, StopReason};
use celf_core::{stream_seed, NodeId, Result, F};
use celf_sampler::SpreadEstimator;
use std::time::Instant;

/// Mutable bookkeeping of a single selection run, owned by the driving thread.
pub(crate) struct RunState<'a, 'g> {
    estimator: &'a SpreadEstimator<'g>,
    seed: u64,
    common_stream: Option<u64>,
    limits: RunLimits,
    track_cost: bool,
    started: Instant,

    seeds: Vec<NodeId>,
    selected: Vec<bool>,
    gains: Vec<F>,
    candidate: Vec<NodeId>,

    pub spread: F,
    pub cost: F,
    evaluations: u64,
    trials: u64,
}

impl<'a, 'g> RunState<'a, 'g> {
    pub fn new(estimator: &'a SpreadEstimator<'g>, config: &SelectorConfig) -> Self {
        let num_nodes = estimator.cascade().graph().num_nodes();
        Self {
            estimator,
            seed: config.seed,
            common_stream: config
                .common_random_numbers
                .then(|| stream_seed(config.seed, 0)),
            limits: config.limits,
            track_cost: config.constraint.is_budget(),
            started: Instant::now(),
            seeds: Vec::new(),
            selected: vec![false; num_nodes],
            gains: Vec::new(),
            candidate: Vec::new(),
            spread: 0.0,
            cost: 0.0,
            evaluations: 0,
            trials: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.selected[node]
    }

    pub fn limit_reached(&self) -> Option<StopReason> {
        if let Some(max) = self.limits.max_trials {
            if self.trials >= max {
                return Some(StopReason::TrialLimit);
            }
        }
        if let Some(limit) = self.limits.time_limit {
            if self.started.elapsed() >= limit {
                return Some(StopReason::TimeLimit);
            }
        }
        None
    }

    fn next_stream(&mut self, trials: usize) -> u64 {
        let stream = match self.common_stream {
            Some(s) => s,
            None => stream_seed(self.seed, self.evaluations),
        };
        self.evaluations += 1;
        self.trials += trials as u64;
        stream
    }

    /// Spread of the current seeds plus `node`, minus the current baseline.
    pub fn marginal_gain(&mut self, node: NodeId, trials: usize) -> Result<F> {
        let stream = self.next_stream(trials);
        self.candidate.clear();
        self.candidate.extend_from_slice(&self.seeds);
        self.candidate.push(node);
        let with_node = self.estimator.estimate(&self.candidate, trials, stream)?;
        Ok(with_node - self.spread)
    }

    /// Append `node` and re-estimate the cumulative spread at `trials`.
    pub fn accept(&mut self, node: NodeId, gain: F, cost: F, trials: usize) -> Result<F> {
        self.seeds.push(node);
        self.selected[node] = true;
        self.gains.push(gain);
        self.cost += cost;

        let stream = self.next_stream(trials);
        self.spread = self.estimator.estimate(&self.seeds, trials, stream)?;
        Ok(self.spread)
    }

    pub fn snapshot(&self, stop: Option<StopReason>) -> RunResult {
        RunResult {
            seeds: self.seeds.clone(),
            spread: self.spread,
            cost: self.track_cost.then_some(self.cost),
            gains: self.gains.clone(),
            evaluations: self.evaluations,
            trials: self.trials,
            stop,
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}
