use celf_core::{DegreeCost, Error, Result, F, DEFAULT_COST_ALPHA};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_K: usize = 5;
pub const DEFAULT_BUDGET: F = 30.0;
pub const DEFAULT_ACTIVATION_PROBABILITY: F = 0.1;
pub const DEFAULT_MC_INIT: usize = 100;
pub const DEFAULT_MC_FINAL: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

/// What bounds the seed set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Constraint {
    /// Exactly `k` seeds (fewer if the graph runs out of nodes).
    Cardinality { k: usize },
    /// Total seed cost at most `budget`.
    Budget { budget: F },
}

impl Constraint {
    pub fn is_budget(&self) -> bool {
        matches!(self, Constraint::Budget { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Constraint::Cardinality { .. } => "cardinality",
            Constraint::Budget { .. } => "budget",
        }
    }
}

/// Priority key used in budget mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetKey {
    /// Marginal gain per unit cost.
    #[default]
    Ratio,
    /// Raw marginal gain, ignoring cost until admission.
    Gain,
}

/// Optional ceilings on a run. Checked between spread evaluations; reaching
/// one stops the run and returns the seeds accepted so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLimits {
    pub max_trials: Option<u64>,
    pub time_limit: Option<Duration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub constraint: Constraint,
    pub activation_probability: F,
    /// Trials per speculative (lazy recompute / initial) estimate.
    pub mc_init: usize,
    /// Trials per accepted-set estimate.
    pub mc_final: usize,
    pub cost_alpha: F,
    pub seed: u64,
    pub parallel: bool,
    /// Reuse the same trial worlds for every estimate.
    pub common_random_numbers: bool,
    pub max_waves: Option<usize>,
    pub budget_key: BudgetKey,
    pub limits: RunLimits,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            constraint: Constraint::Cardinality { k: DEFAULT_K },
            activation_probability: DEFAULT_ACTIVATION_PROBABILITY,
            mc_init: DEFAULT_MC_INIT,
            mc_final: DEFAULT_MC_FINAL,
            cost_alpha: DEFAULT_COST_ALPHA,
            seed: DEFAULT_SEED,
            parallel: true,
            common_random_numbers: true,
            max_waves: None,
            budget_key: BudgetKey::Ratio,
            limits: RunLimits::default(),
        }
    }
}

impl SelectorConfig {
    pub fn cardinality(k: usize) -> Self {
        Self { constraint: Constraint::Cardinality { k }, ..Self::default() }
    }

    pub fn budget(budget: F) -> Self {
        Self { constraint: Constraint::Budget { budget }, ..Self::default() }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn with_probability(mut self, p: F) -> Self {
        self.activation_probability = p;
        self
    }

    pub fn with_trials(mut self, mc_init: usize, mc_final: usize) -> Self {
        self.mc_init = mc_init;
        self.mc_final = mc_final;
        self
    }

    pub fn with_cost_alpha(mut self, alpha: F) -> Self {
        self.cost_alpha = alpha;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_common_random_numbers(mut self, common: bool) -> Self {
        self.common_random_numbers = common;
        self
    }

    pub fn with_max_waves(mut self, max_waves: Option<usize>) -> Self {
        self.max_waves = max_waves;
        self
    }

    pub fn with_budget_key(mut self, key: BudgetKey) -> Self {
        self.budget_key = key;
        self
    }

    pub fn with_max_trials(mut self, max_trials: u64) -> Self {
        self.limits.max_trials = Some(max_trials);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.limits.time_limit = Some(limit);
        self
    }

    pub fn cost_model(&self) -> DegreeCost {
        DegreeCost::new(self.cost_alpha)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mc_init == 0 {
            return Err(Error::config("mc_init must be positive"));
        }
        if self.mc_final == 0 {
            return Err(Error::config("mc_final must be positive"));
        }
        let p = self.activation_probability;
        if !(p > 0.0 && p <= 1.0) {
            return Err(Error::config(format!(
                "activation probability must be in (0, 1], got {p}"
            )));
        }
        if let Constraint::Budget { budget } = self.constraint {
            if budget.is_nan() || budget < 0.0 {
                return Err(Error::config(format!("budget must be non-negative, got {budget}")));
            }
        }
        if self.max_waves == Some(0) {
            return Err(Error::config("max_waves must be positive"));
        }
        self.cost_model().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = SelectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.constraint, Constraint::Cardinality { k: 5 });
        assert_eq!(config.mc_init, 100);
        assert_eq!(config.mc_final, 1000);
        assert!(SelectorConfig::budget(30.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid() {
        let bad = [
            SelectorConfig::default().with_trials(0, 10),
            SelectorConfig::default().with_trials(10, 0),
            SelectorConfig::default().with_probability(0.0),
            SelectorConfig::default().with_probability(1.01),
            SelectorConfig::default().with_probability(F::NAN),
            SelectorConfig::budget(-1.0),
            SelectorConfig::budget(F::NAN),
            SelectorConfig::default().with_cost_alpha(-0.5),
            SelectorConfig::default().with_max_waves(Some(0)),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::Configuration(_))),
                "accepted {:?}",
                config
            );
        }
    }

    #[test]
    fn test_zero_k_and_zero_budget_are_valid() {
        assert!(SelectorConfig::cardinality(0).validate().is_ok());
        assert!(SelectorConfig::budget(0.0).validate().is_ok());
    }

    #[test]
    fn test_serde_shape() {
        let config = SelectorConfig::budget(12.5).with_time_limit(Duration::from_secs(3));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["constraint"]["mode"], "budget");
        assert_eq!(json["constraint"]["budget"], 12.5);
        assert_eq!(json["budget_key"], "ratio");

        let back: SelectorConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
