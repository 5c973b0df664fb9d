use celf_core::{threshold_for, EdgeNoise, Error, GraphIndex, NodeId, Result, F};

/// Per-worker buffers reused across trials.
///
/// Activation marks are epoch-stamped so starting a trial never clears the
/// whole array.
pub struct CascadeScratch {
    marks: Vec<u32>,
    epoch: u32,
    frontier: Vec<NodeId>,
    next: Vec<NodeId>,
}

impl CascadeScratch {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            marks: vec![0; num_nodes],
            epoch: 0,
            frontier: Vec::new(),
            next: Vec::new(),
        }
    }

    fn begin(&mut self, num_nodes: usize) {
        if self.marks.len() != num_nodes {
            self.marks = vec![0; num_nodes];
            self.epoch = 0;
        }
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.marks.fill(0);
            self.epoch = 1;
        }
        self.frontier.clear();
        self.next.clear();
    }

    /// Nodes activated by the most recent trial, ascending.
    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.marks
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m == self.epoch && self.epoch != 0)
            .map(|(u, _)| u)
            .collect()
    }
}

/// Independent Cascade diffusion over a shared, read-only graph index.
#[derive(Clone, Copy, Debug)]
pub struct IndependentCascade<'g> {
    graph: &'g GraphIndex,
    p: F,
    threshold: u64,
    max_waves: Option<usize>,
}

impl<'g> IndependentCascade<'g> {
    pub fn new(graph: &'g GraphIndex, p: F) -> Result<Self> {
        if !(p > 0.0 && p <= 1.0) {
            return Err(Error::config(format!(
                "activation probability must be in (0, 1], got {p}"
            )));
        }
        Ok(Self {
            graph,
            p,
            threshold: threshold_for(p),
            max_waves: None,
        })
    }

    /// Stop each trial after this many waves; `None` runs to quiescence.
    pub fn with_max_waves(mut self, max_waves: Option<usize>) -> Result<Self> {
        if max_waves == Some(0) {
            return Err(Error::config("max_waves must be positive"));
        }
        self.max_waves = max_waves;
        Ok(self)
    }

    pub fn graph(&self) -> &'g GraphIndex {
        self.graph
    }

    pub fn p(&self) -> F {
        self.p
    }

    pub fn max_waves(&self) -> Option<usize> {
        self.max_waves
    }

    pub fn validate_seeds(&self, seeds: &[NodeId]) -> Result<()> {
        seeds.iter().try_for_each(|&s| self.graph.check(s))
    }

    /// One trial with fresh buffers. Returns the number of activated nodes,
    /// seeds included.
    pub fn simulate(&self, seeds: &[NodeId], noise: &mut EdgeNoise) -> Result<usize> {
        self.validate_seeds(seeds)?;
        let mut scratch = CascadeScratch::new(self.graph.num_nodes());
        Ok(self.run_trial(seeds, noise, &mut scratch))
    }

    /// One trial into caller-owned buffers.
    ///
    /// Seeds must already be validated; an out-of-range seed panics.
    /// Duplicate seeds count once.
    pub fn run_trial(
        &self,
        seeds: &[NodeId],
        noise: &mut EdgeNoise,
        scratch: &mut CascadeScratch,
    ) -> usize {
        scratch.begin(self.graph.num_nodes());
        let CascadeScratch { marks, epoch, frontier, next } = scratch;
        let epoch = *epoch;

        let mut activated = 0;
        for &s in seeds {
            if marks[s] != epoch {
                marks[s] = epoch;
                frontier.push(s);
                activated += 1;
            }
        }

        let offsets = self.graph.offsets();
        let slots = self.graph.neighbor_slots();
        let certain = self.p >= 1.0;
        let mut waves = 0;

        while !frontier.is_empty() {
            if self.max_waves.map_or(false, |max| waves >= max) {
                break;
            }
            next.clear();
            for &u in frontier.iter() {
                for slot in offsets[u]..offsets[u + 1] {
                    let v = slots[slot];
                    if marks[v] == epoch {
                        continue;
                    }
                    if certain || noise.flip(slot, self.threshold) {
                        marks[v] = epoch;
                        next.push(v);
                        activated += 1;
                    }
                }
            }
            std::mem::swap(frontier, next);
            waves += 1;
        }

        activated
    }
}
