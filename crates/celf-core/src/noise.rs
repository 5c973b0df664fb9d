use crate::F;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;
const WORD_SPAN: F = 4_294_967_296.0;

/// Seed for evaluation stream `stream` under `global_seed`.
///
/// Uses the ChaCha stream parameter, so distinct streams never overlap.
pub fn stream_seed(global_seed: u64, stream: u64) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(global_seed);
    rng.set_stream(stream);
    rng.next_u64()
}

/// Random source for a single cascade trial.
///
/// Word `i` of the keystream belongs to directed edge slot `i` of the graph
/// index. The outcome of an edge therefore depends only on the trial and the
/// slot, not on the order in which the cascade reaches it.
pub struct EdgeNoise {
    rng: ChaCha8Rng,
    next_slot: u64,
}

impl EdgeNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_slot: 0,
        }
    }

    pub fn from_trial_id(stream_seed: u64, trial_id: u64) -> Self {
        // Combine seeds deterministically
        let seed = stream_seed.wrapping_add(trial_id.wrapping_mul(GOLDEN_GAMMA));
        Self::new(seed)
    }

    /// The 32-bit word owned by `slot`.
    pub fn word(&mut self, slot: usize) -> u32 {
        let slot = slot as u64;
        // Runs of a node are scanned in order; only seek on a jump.
        if slot != self.next_slot {
            self.rng.set_word_pos(slot as u128);
        }
        self.next_slot = slot + 1;
        self.rng.next_u32()
    }

    /// `true` with probability `threshold / 2^32`.
    pub fn flip(&mut self, slot: usize, threshold: u64) -> bool {
        (self.word(slot) as u64) < threshold
    }
}

/// Integer threshold for [`EdgeNoise::flip`]; `p = 1` maps above every word.
pub fn threshold_for(p: F) -> u64 {
    (p.clamp(0.0, 1.0) * WORD_SPAN) as u64
}
