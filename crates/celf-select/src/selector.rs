use crate::config::{BudgetKey, Constraint, SelectorConfig};
use crate::queue::{CandidateEntry, CandidateQueue};
use crate::result::{RunResult, SelectionFailure, StopReason};
use crate::state::RunState;
use celf_core::{CostModel, DegreeCost, Error, GraphIndex, Result, F};
use celf_sampler::{IndependentCascade, SpreadEstimator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// CELF selector over a fixed graph and configuration.
///
/// The configuration is validated once at construction; a run never fails
/// on configuration afterwards. Repeated runs with the same configuration
/// return identical results.
pub struct LazyGreedySelector<'g, C = DegreeCost> {
    graph: &'g GraphIndex,
    config: SelectorConfig,
    cost_model: C,
    estimator: SpreadEstimator<'g>,
}

impl<'g> LazyGreedySelector<'g, DegreeCost> {
    /// Selector using the degree cost model `1 + cost_alpha * degree`.
    pub fn new(graph: &'g GraphIndex, config: SelectorConfig) -> Result<Self> {
        let cost_model = config.cost_model();
        Self::with_cost_model(graph, config, cost_model)
    }
}

impl<'g, C: CostModel> LazyGreedySelector<'g, C> {
    pub fn with_cost_model(graph: &'g GraphIndex, config: SelectorConfig, cost_model: C) -> Result<Self> {
        config.validate()?;
        let cascade = IndependentCascade::new(graph, config.activation_probability)?
            .with_max_waves(config.max_waves)?;
        let estimator = SpreadEstimator::new(cascade).with_parallel(config.parallel);
        Ok(Self { graph, config, cost_model, estimator })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn estimator(&self) -> &SpreadEstimator<'g> {
        &self.estimator
    }

    pub fn run(&self) -> std::result::Result<RunResult, SelectionFailure> {
        self.run_with(|_| {})
    }

    /// Run to completion, calling `on_accept` with a snapshot after every
    /// accepted seed.
    pub fn run_with<O>(&self, mut on_accept: O) -> std::result::Result<RunResult, SelectionFailure>
    where
        O: FnMut(&RunResult),
    {
        info!(
            nodes = self.graph.num_nodes(),
            edges = self.graph.num_edges(),
            mode = self.config.constraint.label(),
            p = self.config.activation_probability,
            mc_init = self.config.mc_init,
            mc_final = self.config.mc_final,
            "starting lazy greedy selection"
        );

        let mut run = RunState::new(&self.estimator, &self.config);
        match self.drive(&mut run, &mut on_accept) {
            Ok(stop) => {
                let result = run.snapshot(Some(stop));
                info!(
                    seeds = result.len(),
                    spread = result.spread,
                    cost = ?result.cost,
                    evaluations = result.evaluations,
                    trials = result.trials,
                    stop = ?stop,
                    elapsed_ms = run.elapsed_ms() as u64,
                    "selection finished"
                );
                Ok(result)
            }
            Err(error) => Err(SelectionFailure { partial: run.snapshot(None), error }),
        }
    }

    fn priority(&self, gain: F, cost: F) -> F {
        match (self.config.constraint, self.config.budget_key) {
            (Constraint::Budget { .. }, BudgetKey::Ratio) => gain / cost,
            _ => gain,
        }
    }

    fn costs(&self) -> Result<Vec<F>> {
        (0..self.graph.num_nodes())
            .map(|v| {
                let cost = self.cost_model.cost(self.graph, v)?;
                if !(cost.is_finite() && cost > 0.0) {
                    return Err(Error::config(format!(
                        "cost of node {v} must be finite and positive, got {cost}"
                    )));
                }
                Ok(cost)
            })
            .collect()
    }

    fn drive<O>(&self, run: &mut RunState<'_, 'g>, on_accept: &mut O) -> Result<StopReason>
    where
        O: FnMut(&RunResult),
    {
        let constraint = self.config.constraint;
        let SelectorConfig { mc_init, mc_final, .. } = self.config;

        if self.graph.is_empty() {
            return Ok(StopReason::Exhausted);
        }
        if constraint == (Constraint::Cardinality { k: 0 }) {
            return Ok(StopReason::Satisfied);
        }

        let costs = self.costs()?;
        if let Constraint::Budget { budget } = constraint {
            let cheapest = costs.iter().copied().fold(F::INFINITY, F::min);
            if budget < cheapest {
                debug!(budget, cheapest, "budget below cheapest node");
                return Ok(StopReason::Satisfied);
            }
        }

        // Singleton spreads are the initial marginal gains.
        let mut entries = Vec::with_capacity(costs.len());
        for (v, &cost) in costs.iter().enumerate() {
            if let Some(stop) = run.limit_reached() {
                return Ok(stop);
            }
            let gain = run.marginal_gain(v, mc_init)?;
            entries.push(CandidateEntry::new(self.priority(gain, cost), v, gain, cost, 0));
        }
        let mut queue = CandidateQueue::from(entries);
        debug!(candidates = queue.len(), "initial gains computed");

        // Cheapest cost among unselected nodes; budget mode stops once it cannot fit.
        let mut cheapest_left = cheapest_unselected(&costs, run);

        loop {
            match constraint {
                Constraint::Cardinality { k } if run.len() >= k => return Ok(StopReason::Satisfied),
                Constraint::Budget { budget } if run.cost >= budget => return Ok(StopReason::Satisfied),
                Constraint::Budget { budget }
                    if cheapest_left.is_finite() && run.cost + cheapest_left > budget =>
                {
                    debug!(spent = run.cost, cheapest = cheapest_left, "no remaining node fits the budget");
                    return Ok(StopReason::Satisfied);
                }
                _ => {}
            }
            if let Some(stop) = run.limit_reached() {
                return Ok(stop);
            }
            let Some(entry) = queue.pop() else {
                return Ok(StopReason::Exhausted);
            };

            if run.contains(entry.node) {
                continue;
            }

            // A candidate that does not fit now never will: spent cost only grows.
            if let Constraint::Budget { budget } = constraint {
                if run.cost + entry.cost > budget {
                    trace!(node = entry.node, cost = entry.cost, spent = run.cost, "over budget, discarded");
                    continue;
                }
            }

            if !entry.is_fresh(run.len()) {
                let gain = run.marginal_gain(entry.node, mc_init)?;
                trace!(node = entry.node, cached = entry.gain, gain, "recomputed stale gain");
                queue.push(CandidateEntry::new(
                    self.priority(gain, entry.cost),
                    entry.node,
                    gain,
                    entry.cost,
                    run.len(),
                ));
                continue;
            }

            let spread = run.accept(entry.node, entry.gain, entry.cost, mc_final)?;
            debug!(node = entry.node, gain = entry.gain, spread, cost = run.cost, "accepted seed");
            if constraint.is_budget() {
                cheapest_left = cheapest_unselected(&costs, run);
            }
            on_accept(&run.snapshot(None));
        }
    }
}

/// Minimum cost over unselected nodes, infinite once every node is selected.
fn cheapest_unselected(costs: &[F], run: &RunState<'_, '_>) -> F {
    costs
        .iter()
        .enumerate()
        .filter(|&(v, _)| !run.contains(v))
        .map(|(_, &c)| c)
        .fold(F::INFINITY, F::min)
}

/// Outcome of [`cost_effective_forward`]: both budget runs and the winner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostEffectiveResult {
    pub best: RunResult,
    pub key: BudgetKey,
    pub ratio: RunResult,
    pub gain: RunResult,
}

/// Budgeted selection run under both priority keys, keeping the larger
/// spread. Ties keep the gain-per-cost run.
pub fn cost_effective_forward(
    graph: &GraphIndex,
    config: &SelectorConfig,
) -> std::result::Result<CostEffectiveResult, SelectionFailure> {
    cost_effective_forward_with(graph, config, &config.cost_model())
}

pub fn cost_effective_forward_with<C: CostModel>(
    graph: &GraphIndex,
    config: &SelectorConfig,
    cost_model: &C,
) -> std::result::Result<CostEffectiveResult, SelectionFailure> {
    if !config.constraint.is_budget() {
        return Err(Error::config("cost-effective forward requires a budget constraint").into());
    }

    let run_key = |key: BudgetKey| -> std::result::Result<RunResult, SelectionFailure> {
        let keyed = config.clone().with_budget_key(key);
        LazyGreedySelector::with_cost_model(graph, keyed, cost_model)
            .map_err(|error| SelectionFailure {
                partial: RunResult { cost: Some(0.0), ..RunResult::empty() },
                error,
            })?
            .run()
    };
    let ratio = run_key(BudgetKey::Ratio)?;
    // A failed second run still hands back the finished ratio run.
    let gain = run_key(BudgetKey::Gain).map_err(|failure| SelectionFailure {
        partial: ratio.clone(),
        error: failure.error,
    })?;

    let (best, key) = if gain.spread > ratio.spread {
        (gain.clone(), BudgetKey::Gain)
    } else {
        (ratio.clone(), BudgetKey::Ratio)
    };
    info!(key = ?key, ratio_spread = ratio.spread, gain_spread = gain.spread, "cost-effective forward");

    Ok(CostEffectiveResult { best, key, ratio, gain })
}
