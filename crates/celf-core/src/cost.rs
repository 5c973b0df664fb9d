use crate::{Error, GraphIndex, NodeId, Result, F};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COST_ALPHA: F = 0.01;

/// Per-node selection cost used by budgeted selection.
pub trait CostModel: Send + Sync {
    fn cost(&self, graph: &GraphIndex, node: NodeId) -> Result<F>;
}

/// `cost(v) = 1 + alpha * degree(v)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DegreeCost {
    pub alpha: F,
}

impl DegreeCost {
    pub fn new(alpha: F) -> Self {
        Self { alpha }
    }

    /// Every node costs exactly 1.
    pub fn uniform() -> Self {
        Self { alpha: 0.0 }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(Error::config(format!(
                "cost alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

impl Default for DegreeCost {
    fn default() -> Self {
        Self { alpha: DEFAULT_COST_ALPHA }
    }
}

impl CostModel for DegreeCost {
    fn cost(&self, graph: &GraphIndex, node: NodeId) -> Result<F> {
        let degree = graph.degree(node)?;
        Ok(1.0 + self.alpha * degree as F)
    }
}

impl<C: CostModel + ?Sized> CostModel for &C {
    fn cost(&self, graph: &GraphIndex, node: NodeId) -> Result<F> {
        (**self).cost(graph, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degree_cost() {
        let g = GraphIndex::build(&[(0, 1), (0, 2), (0, 3)]).unwrap();
        let model = DegreeCost::default();
        assert_relative_eq!(model.cost(&g, 0).unwrap(), 1.03);
        assert_relative_eq!(model.cost(&g, 1).unwrap(), 1.01);
        assert_relative_eq!(DegreeCost::uniform().cost(&g, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_out_of_range_node() {
        let g = GraphIndex::build(&[(0, 1)]).unwrap();
        assert_eq!(
            DegreeCost::default().cost(&g, 2),
            Err(Error::OutOfRange { node: 2, n: 2 })
        );
    }

    #[test]
    fn test_validate_alpha() {
        assert!(DegreeCost::new(0.5).validate().is_ok());
        assert!(DegreeCost::new(-0.1).validate().is_err());
        assert!(DegreeCost::new(F::NAN).validate().is_err());
    }
}
