use crate::config::{Constraint, SelectorConfig};
use crate::result::{RunResult, SelectionFailure, StopReason};
use crate::state::RunState;
use celf_core::{Error, GraphIndex, NodeId, Result, F};
use celf_sampler::{IndependentCascade, SpreadEstimator};
use tracing::{debug, info};

/// Plain greedy baseline: every round re-evaluates every unselected node.
///
/// Cardinality only. All estimates use `mc_final` trials.
pub struct NaiveGreedy<'g> {
    graph: &'g GraphIndex,
    config: SelectorConfig,
    estimator: SpreadEstimator<'g>,
}

impl<'g> NaiveGreedy<'g> {
    pub fn new(graph: &'g GraphIndex, config: SelectorConfig) -> Result<Self> {
        config.validate()?;
        if config.constraint.is_budget() {
            return Err(Error::config("naive greedy supports cardinality mode only"));
        }
        let cascade = IndependentCascade::new(graph, config.activation_probability)?
            .with_max_waves(config.max_waves)?;
        let estimator = SpreadEstimator::new(cascade).with_parallel(config.parallel);
        Ok(Self { graph, config, estimator })
    }

    pub fn run(&self) -> std::result::Result<RunResult, SelectionFailure> {
        self.run_with(|_| {})
    }

    pub fn run_with<O>(&self, mut on_accept: O) -> std::result::Result<RunResult, SelectionFailure>
    where
        O: FnMut(&RunResult),
    {
        let mut run = RunState::new(&self.estimator, &self.config);
        match self.drive(&mut run, &mut on_accept) {
            Ok(stop) => {
                let result = run.snapshot(Some(stop));
                info!(
                    seeds = result.len(),
                    spread = result.spread,
                    evaluations = result.evaluations,
                    elapsed_ms = run.elapsed_ms() as u64,
                    "naive greedy finished"
                );
                Ok(result)
            }
            Err(error) => Err(SelectionFailure { partial: run.snapshot(None), error }),
        }
    }

    fn drive<O>(&self, run: &mut RunState<'_, 'g>, on_accept: &mut O) -> Result<StopReason>
    where
        O: FnMut(&RunResult),
    {
        let k = match self.config.constraint {
            Constraint::Cardinality { k } => k,
            Constraint::Budget { .. } => {
                return Err(Error::config("naive greedy supports cardinality mode only"))
            }
        };
        let trials = self.config.mc_final;

        while run.len() < k {
            let mut best: Option<(NodeId, F)> = None;
            for v in 0..self.graph.num_nodes() {
                if run.contains(v) {
                    continue;
                }
                if let Some(stop) = run.limit_reached() {
                    return Ok(stop);
                }
                let gain = run.marginal_gain(v, trials)?;
                if best.map_or(true, |(_, g)| gain > g) {
                    best = Some((v, gain));
                }
            }

            let Some((node, gain)) = best else {
                return Ok(StopReason::Exhausted);
            };
            let spread = run.accept(node, gain, 0.0, trials)?;
            debug!(node, gain, spread, "accepted seed");
            on_accept(&run.snapshot(None));
        }

        Ok(StopReason::Satisfied)
    }
}
