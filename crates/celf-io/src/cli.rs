use crate::{load_graph, RunManifest};
use anyhow::{bail, Context};
use celf_core::{stream_seed, GraphIndex, NodeId, DEFAULT_COST_ALPHA};
use celf_sampler::{IndependentCascade, SpreadEstimator};
use celf_select::config::{
    DEFAULT_ACTIVATION_PROBABILITY, DEFAULT_BUDGET, DEFAULT_K, DEFAULT_MC_FINAL, DEFAULT_MC_INIT,
    DEFAULT_SEED,
};
use celf_select::{
    cost_effective_forward, BudgetKey, Constraint, LazyGreedySelector, NaiveGreedy, RunResult,
    SelectorConfig,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "celf")]
#[command(about = "CELF - lazy greedy influence maximization")]
#[command(long_about = "Seed selection under the Independent Cascade model with cardinality or budget constraints")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select a seed set maximizing expected spread
    Select(SelectArgs),
    /// Estimate the expected spread of a given seed set
    Estimate(EstimateArgs),
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Undirected edge list, one `u v` pair per line
    pub graph: PathBuf,

    /// Declared node count; keeps isolated nodes up to this id
    #[arg(long)]
    pub nodes: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CascadeArgs {
    /// Activation probability of each edge
    #[arg(short, long = "probability", default_value_t = DEFAULT_ACTIVATION_PROBABILITY)]
    pub p: f64,

    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Cap on propagation waves per trial
    #[arg(long)]
    pub max_waves: Option<usize>,

    /// Run trials on the current thread only
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(flatten)]
    pub cascade: CascadeArgs,

    /// Selection mode
    #[arg(long, value_enum, default_value = "cardinality")]
    pub mode: ModeType,

    /// Number of seeds (cardinality mode)
    #[arg(short, long, default_value_t = DEFAULT_K)]
    pub k: usize,

    /// Total cost allowed (budget modes)
    #[arg(short, long, default_value_t = DEFAULT_BUDGET)]
    pub budget: f64,

    /// Degree cost weight: cost(v) = 1 + alpha * degree(v)
    #[arg(long, default_value_t = DEFAULT_COST_ALPHA)]
    pub alpha: f64,

    /// Priority key in budget mode
    #[arg(long, value_enum, default_value = "ratio")]
    pub budget_key: KeyType,

    /// Trials per initial or recomputed gain
    #[arg(long, default_value_t = DEFAULT_MC_INIT)]
    pub mc_init: usize,

    /// Trials per accepted-set spread
    #[arg(long, default_value_t = DEFAULT_MC_FINAL)]
    pub mc_final: usize,

    /// Draw fresh trial worlds for every estimate
    #[arg(long)]
    pub independent_streams: bool,

    /// Stop after this many cascade trials
    #[arg(long)]
    pub max_trials: Option<u64>,

    /// Stop after this many seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Use the full-rescan greedy baseline (cardinality mode only)
    #[arg(long)]
    pub naive: bool,

    /// Write a JSON run manifest here
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(flatten)]
    pub cascade: CascadeArgs,

    /// Comma-separated seed node ids
    #[arg(long, value_delimiter = ',', required = true)]
    pub seeds: Vec<NodeId>,

    /// Number of trials
    #[arg(long, default_value_t = DEFAULT_MC_FINAL)]
    pub trials: usize,

    /// Write a JSON run manifest here
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeType {
    #[value(name = "cardinality")]
    Cardinality,
    #[value(name = "budget")]
    Budget,
    #[value(name = "cost-effective")]
    CostEffective,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KeyType {
    #[value(name = "ratio")]
    Ratio,
    #[value(name = "gain")]
    Gain,
}

impl From<KeyType> for BudgetKey {
    fn from(key: KeyType) -> Self {
        match key {
            KeyType::Ratio => BudgetKey::Ratio,
            KeyType::Gain => BudgetKey::Gain,
        }
    }
}

impl SelectArgs {
    pub fn to_config(&self) -> anyhow::Result<SelectorConfig> {
        let constraint = match self.mode {
            ModeType::Cardinality => Constraint::Cardinality { k: self.k },
            ModeType::Budget | ModeType::CostEffective => Constraint::Budget { budget: self.budget },
        };
        let mut config = SelectorConfig::default()
            .with_constraint(constraint)
            .with_probability(self.cascade.p)
            .with_trials(self.mc_init, self.mc_final)
            .with_cost_alpha(self.alpha)
            .with_seed(self.cascade.seed)
            .with_parallel(!self.cascade.sequential)
            .with_common_random_numbers(!self.independent_streams)
            .with_max_waves(self.cascade.max_waves)
            .with_budget_key(self.budget_key.into());
        if let Some(max) = self.max_trials {
            config = config.with_max_trials(max);
        }
        if let Some(secs) = self.time_limit {
            let limit = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid time limit {secs}"))?;
            config = config.with_time_limit(limit);
        }
        Ok(config)
    }
}

pub fn run_select_command(args: SelectArgs) -> anyhow::Result<()> {
    if args.naive && args.mode != ModeType::Cardinality {
        bail!("--naive supports cardinality mode only");
    }
    let config = args.to_config()?;
    let graph = load_graph(&args.graph.graph, args.graph.nodes)?;

    println!("CELF Seed Selection");
    println!("===================");
    println!("Graph: {:?}", args.graph.graph);
    println!("Nodes: {}", graph.num_nodes());
    println!("Edges: {}", graph.num_edges());
    println!("Mode: {:?}", args.mode);
    println!("p: {}", config.activation_probability);
    println!("Trials: {} / {}", config.mc_init, config.mc_final);
    println!("Seed: {}", config.seed);

    let started = Instant::now();
    let (algorithm, result, key) = select(&graph, &config, args.mode, args.naive)?;
    let elapsed = started.elapsed().as_secs_f64();

    println!();
    print_result(&result);
    if let Some(key) = key {
        println!("Winning key: {:?}", key);
    }
    println!("Elapsed: {:.3}s", elapsed);

    if let Some(out) = &args.out {
        let mut manifest = RunManifest::new("select", &args.graph.graph, &graph, config, algorithm)
            .with_result(result);
        manifest.budget_key = key;
        manifest.elapsed_secs = elapsed;
        manifest.save_to_file(out)?;
        println!("Wrote manifest to {}", out.display());
    }
    Ok(())
}

fn select(
    graph: &GraphIndex,
    config: &SelectorConfig,
    mode: ModeType,
    naive: bool,
) -> anyhow::Result<(&'static str, RunResult, Option<BudgetKey>)> {
    // A failed run still reports what it had selected.
    let report = |failure: celf_select::SelectionFailure| {
        if !failure.partial.is_empty() {
            eprintln!("Partial seeds before failure: {:?}", failure.partial.seeds);
        }
        anyhow::Error::new(failure)
    };

    if mode == ModeType::CostEffective {
        let outcome = cost_effective_forward(graph, config).map_err(report)?;
        return Ok(("cost_effective_forward", outcome.best, Some(outcome.key)));
    }
    if naive {
        let result = NaiveGreedy::new(graph, config.clone())?.run().map_err(report)?;
        return Ok(("naive_greedy", result, None));
    }
    let result = LazyGreedySelector::new(graph, config.clone())?
        .run()
        .map_err(report)?;
    Ok(("lazy_greedy", result, None))
}

fn print_result(result: &RunResult) {
    println!("Selection Results:");
    println!("==================");
    println!("Seeds: {:?}", result.seeds);
    println!("Spread: {:.4}", result.spread);
    if let Some(cost) = result.cost {
        println!("Cost: {:.4}", cost);
    }
    let gains: Vec<String> = result.gains.iter().map(|g| format!("{g:.4}")).collect();
    println!("Gains: [{}]", gains.join(", "));
    println!("Evaluations: {}", result.evaluations);
    println!("Trials: {}", result.trials);
    if let Some(stop) = result.stop {
        println!("Stopped: {:?}", stop);
    }
}

pub fn run_estimate_command(args: EstimateArgs) -> anyhow::Result<()> {
    let graph = load_graph(&args.graph.graph, args.graph.nodes)?;
    let cascade = IndependentCascade::new(&graph, args.cascade.p)?
        .with_max_waves(args.cascade.max_waves)?;
    let estimator = SpreadEstimator::new(cascade).with_parallel(!args.cascade.sequential);

    let started = Instant::now();
    let stats = estimator.estimate_stats(&args.seeds, args.trials, stream_seed(args.cascade.seed, 0))?;
    let elapsed = started.elapsed().as_secs_f64();

    println!("Seeds: {:?}", args.seeds);
    println!("Trials: {}", stats.trials);
    println!("Spread: {:.4}", stats.mean);
    println!("Std error: {:.4}", stats.std_error);
    println!("95% CI: [{:.4}, {:.4}]", stats.mean - stats.ci95(), stats.mean + stats.ci95());

    if let Some(out) = &args.out {
        let config = SelectorConfig::cardinality(args.seeds.len())
            .with_probability(args.cascade.p)
            .with_trials(args.trials, args.trials)
            .with_seed(args.cascade.seed)
            .with_parallel(!args.cascade.sequential)
            .with_max_waves(args.cascade.max_waves);
        let mut manifest = RunManifest::new("estimate", &args.graph.graph, &graph, config, "monte_carlo");
        manifest.seeds = args.seeds.clone();
        manifest.estimate = Some(stats);
        manifest.elapsed_secs = elapsed;
        manifest.save_to_file(out)?;
        println!("Wrote manifest to {}", out.display());
    }
    Ok(())
}
