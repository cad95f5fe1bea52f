//! Error types for fluxon-core.

use thiserror::Error;

/// Broad failure category shared by every fluxon crate.
///
/// Callers that translate engine failures into protocol responses match on
/// this instead of on the individual error variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid node index, bad element value or an unusable element reference.
    Configuration,
    /// A label or parameter name that does not resolve.
    Lookup,
    /// Ill-posed equations of motion or potential.
    Model,
    /// An iterative solver ran out of budget.
    Convergence,
    /// A vector whose length disagrees with the node count.
    Dimension,
    /// Missing or malformed simulation input (time grid, initial condition).
    Input,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("node {node} is out of range for a circuit with {num_nodes} nodes")]
    NodeOutOfRange { node: u32, num_nodes: usize },
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DimensionMismatch { .. } => ErrorKind::Dimension,
            Error::NodeOutOfRange { .. } => ErrorKind::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
