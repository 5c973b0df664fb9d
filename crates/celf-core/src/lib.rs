pub mod error;
pub mod graph;
pub mod cost;
pub mod noise;

// Core types
pub type F = f64;
pub type NodeId = usize;

pub use error::{Error, Result};
pub use graph::{GraphIndex, GraphStats};

// Selection cost
pub use cost::{CostModel, DegreeCost, DEFAULT_COST_ALPHA};

// Reproducible randomness
pub use noise::{stream_seed, threshold_for, EdgeNoise};
