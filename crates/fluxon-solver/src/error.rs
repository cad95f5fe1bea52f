//! Error types for fluxon-solver.

use fluxon_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] fluxon_core::Error),

    #[error(transparent)]
    Devices(#[from] fluxon_devices::Error),

    #[error("node {0} has no incident capacitance")]
    DegenerateNode(usize),

    #[error("capacitance matrix is singular (floating capacitor network?)")]
    SingularCapacitance,

    #[error("singular matrix")]
    SingularMatrix,

    #[error("invalid qubit parameters: {0}")]
    InvalidQubitParameters(String),

    #[error("potential is ill-conditioned near {phase} rad: {reason}")]
    IllConditioned { phase: f64, reason: String },

    #[error("{method} did not converge after {iterations} iterations")]
    ConvergenceFailed {
        method: &'static str,
        iterations: usize,
    },

    #[error("current balance violated at node {node}: net {net:e} A against {gross:e} A flowing")]
    CurrentImbalance { node: usize, net: f64, gross: f64 },

    #[error("integration failed at t = {time:e} s: {reason}")]
    IntegrationFailed { time: f64, reason: String },

    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),

    #[error("no time grid set")]
    MissingTimeGrid,

    #[error("no initial phases set")]
    MissingInitialCondition,

    #[error("no simulation has been run")]
    NoTrajectory,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(e) => e.kind(),
            Error::Devices(e) => e.kind(),
            Error::DegenerateNode(_)
            | Error::SingularCapacitance
            | Error::SingularMatrix
            | Error::InvalidQubitParameters(_)
            | Error::IllConditioned { .. } => ErrorKind::Model,
            Error::ConvergenceFailed { .. }
            | Error::CurrentImbalance { .. }
            | Error::IntegrationFailed { .. } => ErrorKind::Convergence,
            Error::InvalidTimeGrid(_)
            | Error::MissingTimeGrid
            | Error::MissingInitialCondition
            | Error::NoTrajectory => ErrorKind::Input,
            Error::DimensionMismatch { .. } => ErrorKind::Dimension,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check a vector length against the node count.
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, actual })
    }
}
