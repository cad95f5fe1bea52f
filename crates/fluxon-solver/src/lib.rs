//! Solvers for superconducting circuits.
//!
//! This crate provides:
//! - Equations of motion assembled from a [`Circuit`](fluxon_devices::Circuit)
//! - Adaptive Dormand–Prince time integration
//! - Levenberg–Marquardt fixed-point search with a current-balance check
//! - Potential analysis for rf-SQUID qubits
//! - [`Session`], which bundles a circuit with its simulation state

pub mod dynamics;
pub mod equilibrium;
pub mod error;
pub mod integrator;
pub mod linear;
pub mod observables;
pub mod qubit;
pub mod roots;
pub mod session;
pub mod transient;

pub use dynamics::{CurrentBalance, Dynamics};
pub use equilibrium::{FixedPoint, FixedPointCriteria, solve_fixed_point};
pub use error::{Error, Result};
pub use integrator::{IntegrationStats, IntegratorConfig, OdeSystem, integrate};
pub use observables::{element_series, total_energy};
pub use qubit::{
    Extrema, QubitParameters, WellPair, barrier_height, extrema, plasma_frequency,
    single_photon_offset,
};
pub use roots::{RootCriteria, newton};
pub use session::{Quantity, Session};
pub use transient::{TimePoint, Trajectory, simulate};
