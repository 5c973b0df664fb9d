//! Property tests for the compressed graph index.
//!
//! - Construction is idempotent and independent of edge order
//! - The index is symmetric
//! - Degrees agree with offsets

use celf_core::{DegreeCost, CostModel, GraphIndex};
use proptest::prelude::*;

fn arb_edges() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..40, 0i64..40), 1..120)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn build_is_idempotent(edges in arb_edges()) {
        let a = GraphIndex::build(&edges).unwrap();
        let b = GraphIndex::build(&edges).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn build_ignores_edge_order(edges in arb_edges(), rotate in 0usize..120, flip in any::<bool>()) {
        let mut shuffled = edges.clone();
        let len = shuffled.len();
        shuffled.rotate_left(rotate % len);
        shuffled.reverse();
        if flip {
            for e in shuffled.iter_mut() {
                *e = (e.1, e.0);
            }
        }
        let a = GraphIndex::build(&edges).unwrap();
        let b = GraphIndex::build(&shuffled).unwrap();
        prop_assert_eq!(a.offsets(), b.offsets());
        prop_assert_eq!(a.neighbor_slots(), b.neighbor_slots());
    }

    #[test]
    fn index_is_symmetric(edges in arb_edges()) {
        let g = GraphIndex::build(&edges).unwrap();
        for u in 0..g.num_nodes() {
            for &v in g.neighbors(u).unwrap() {
                let back = g.neighbors(v).unwrap().iter().filter(|&&w| w == u).count();
                let forth = g.neighbors(u).unwrap().iter().filter(|&&w| w == v).count();
                prop_assert_eq!(back, forth);
            }
        }
    }

    #[test]
    fn degrees_match_offsets(edges in arb_edges()) {
        let g = GraphIndex::build(&edges).unwrap();
        let offsets = g.offsets();
        prop_assert_eq!(offsets.len(), g.num_nodes() + 1);
        prop_assert_eq!(offsets[g.num_nodes()], g.neighbor_slots().len());
        let mut total = 0;
        for u in 0..g.num_nodes() {
            let d = g.degree(u).unwrap();
            prop_assert_eq!(d, g.neighbors(u).unwrap().len());
            prop_assert!(offsets[u] <= offsets[u + 1]);
            total += d;
        }
        prop_assert_eq!(total, 2 * g.num_edges());
    }

    #[test]
    fn degree_cost_is_at_least_one(edges in arb_edges(), alpha in 0.0f64..1.0) {
        let g = GraphIndex::build(&edges).unwrap();
        let model = DegreeCost::new(alpha);
        for u in 0..g.num_nodes() {
            let c = model.cost(&g, u).unwrap();
            prop_assert!(c >= 1.0);
        }
        prop_assert!(model.cost(&g, g.num_nodes()).is_err());
    }
}
