//! Core building blocks for fluxon.
//!
//! This crate provides node identifiers, physical constants, the nodal
//! matrix used to assemble equations of motion, and the instantaneous
//! phase snapshot that elements read their observables from.

pub mod error;
pub mod nodal;
pub mod node;
pub mod state;
pub mod units;

pub use error::{Error, ErrorKind, Result};
pub use nodal::NodalSystem;
pub use node::NodeId;
pub use state::PhaseState;
pub use units::{FLUX_QUANTUM, HBAR, PHI0_BAR};
