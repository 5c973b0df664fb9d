use crate::NodeId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid graph input (negative ids, empty edge list, ids past the declared node count).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A node id outside `[0, n)` was passed to a query.
    #[error("node {node} out of range for graph with {n} nodes")]
    OutOfRange { node: NodeId, n: usize },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
