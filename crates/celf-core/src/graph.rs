use crate::{Error, NodeId, Result};
use serde::{Deserialize, Serialize};

/// Summary counts for an indexed graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub max_degree: usize,
    pub isolated: usize,
}

/// Immutable undirected graph in compressed adjacency form.
///
/// Neighbors of `u` are `neighbors[offsets[u]..offsets[u + 1]]`. Each
/// undirected edge is stored once in the run of each endpoint, so the index
/// is symmetric and `offsets[n]` equals twice the edge count. Runs are sorted
/// ascending, which makes the layout independent of input edge order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphIndex {
    offsets: Vec<usize>,
    neighbors: Vec<NodeId>,
}

impl Default for GraphIndex {
    fn default() -> Self {
        Self { offsets: vec![0], neighbors: Vec::new() }
    }
}

impl GraphIndex {
    /// Build from an edge list; the node count is `max id + 1`.
    ///
    /// Fails on an empty edge list, a negative id, or an id too large to index.
    pub fn build(edges: &[(i64, i64)]) -> Result<Self> {
        if edges.is_empty() {
            return Err(Error::malformed("edge list is empty"));
        }
        let pairs = to_node_pairs(edges)?;
        let n = match pairs.iter().map(|&(u, v)| u.max(v)).max() {
            Some(m) => m
                .checked_add(1)
                .ok_or_else(|| Error::malformed(format!("node id {m} is too large")))?,
            None => 0,
        };
        Self::from_pairs(n, &pairs)
    }

    /// Build with an explicit node count, allowing isolated nodes and an
    /// empty edge list. Ids must lie in `[0, num_nodes)`.
    pub fn build_with_nodes(num_nodes: usize, edges: &[(i64, i64)]) -> Result<Self> {
        let pairs = to_node_pairs(edges)?;
        if let Some(i) = pairs.iter().position(|&(u, v)| u >= num_nodes || v >= num_nodes) {
            let (u, v) = pairs[i];
            return Err(Error::malformed(format!(
                "edge {i} ({u}, {v}) exceeds declared node count {num_nodes}"
            )));
        }
        Self::from_pairs(num_nodes, &pairs)
    }

    fn from_pairs(n: usize, pairs: &[(NodeId, NodeId)]) -> Result<Self> {
        let too_large = || Error::malformed(format!("cannot index {n} nodes"));
        let len = n.checked_add(1).ok_or_else(too_large)?;
        let mut offsets = Vec::new();
        offsets.try_reserve_exact(len).map_err(|_| too_large())?;
        offsets.resize(len, 0usize);
        for &(u, v) in pairs {
            if u == v {
                continue;
            }
            offsets[u + 1] += 1;
            offsets[v + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets[..n].to_vec();
        let mut neighbors = vec![0; offsets[n]];
        for &(u, v) in pairs {
            if u == v {
                continue;
            }
            neighbors[cursor[u]] = v;
            cursor[u] += 1;
            neighbors[cursor[v]] = u;
            cursor[v] += 1;
        }

        for u in 0..n {
            neighbors[offsets[u]..offsets[u + 1]].sort_unstable();
        }

        Ok(Self { offsets, neighbors })
    }

    pub fn num_nodes(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn num_edges(&self) -> usize {
        self.neighbors.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.num_nodes() == 0
    }

    pub fn contains(&self, u: NodeId) -> bool {
        u < self.num_nodes()
    }

    pub fn check(&self, u: NodeId) -> Result<()> {
        if self.contains(u) {
            Ok(())
        } else {
            Err(Error::OutOfRange { node: u, n: self.num_nodes() })
        }
    }

    pub fn degree(&self, u: NodeId) -> Result<usize> {
        self.check(u)?;
        Ok(self.offsets[u + 1] - self.offsets[u])
    }

    /// Neighbor run of `u`, ascending.
    pub fn neighbors(&self, u: NodeId) -> Result<&[NodeId]> {
        self.check(u)?;
        Ok(&self.neighbors[self.offsets[u]..self.offsets[u + 1]])
    }

    /// Raw offsets, `num_nodes + 1` entries.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Flat neighbor array. Position `i` is the directed edge slot `i`.
    pub fn neighbor_slots(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Each undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        (0..self.num_nodes()).flat_map(move |u| {
            self.neighbors[self.offsets[u]..self.offsets[u + 1]]
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| (u, v))
        })
    }

    pub fn stats(&self) -> GraphStats {
        let n = self.num_nodes();
        let degrees = self.offsets.windows(2).map(|w| w[1] - w[0]);
        GraphStats {
            num_nodes: n,
            num_edges: self.num_edges(),
            max_degree: degrees.clone().max().unwrap_or(0),
            isolated: degrees.filter(|&d| d == 0).count(),
        }
    }
}

fn to_node_pairs(edges: &[(i64, i64)]) -> Result<Vec<(NodeId, NodeId)>> {
    edges
        .iter()
        .enumerate()
        .map(|(i, &(u, v))| {
            let convert = |x: i64| {
                NodeId::try_from(x).map_err(|_| {
                    Error::malformed(format!("edge {i} ({u}, {v}) references negative node id {x}"))
                })
            };
            Ok((convert(u)?, convert(v)?))
        })
        .collect()
}
