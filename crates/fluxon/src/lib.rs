//! # Fluxon
//!
//! Time-domain simulation of lumped superconducting circuits.
//!
//! Fluxon provides:
//! - A labelled circuit graph of capacitors, inductors, Josephson junctions,
//!   resistors, mutual inductances and current biases
//! - Equations of motion in node phases, integrated with an adaptive
//!   Dormand–Prince method
//! - Fixed points of the circuit at rest
//! - Potential analysis of a flux-biased rf-SQUID qubit
//!
//! ## Quick Start
//!
//! ```rust
//! use fluxon::prelude::*;
//!
//! // An LC resonator released from a phase of 0.3 rad.
//! let mut session = Session::new(1);
//! session.add_capacitor("C", 1e-12, 0, None).unwrap();
//! session.add_inductor("L", 1e-9, 0.0, 0, None).unwrap();
//! session.set_time_range(0.0, 1e-10, 1e-11).unwrap();
//! session.set_delta(vec![0.3]).unwrap();
//! session.simulate().unwrap();
//!
//! let energy = session.energy().unwrap();
//! assert_eq!(energy.len(), session.time().unwrap().len());
//! ```
//!
//! ## Qubit Analysis
//!
//! ```rust
//! use std::f64::consts::PI;
//! use fluxon::prelude::*;
//!
//! let params = QubitParameters::new(1e-6, 1e-9, PI, 1e-15);
//! let session = Session::new(1);
//! let wells = session.qubit_extrema(&params).unwrap();
//! assert!(wells.left < wells.barrier && wells.barrier < wells.right);
//! ```

pub use fluxon_core as core;
pub use fluxon_devices as devices;
pub use fluxon_solver as solver;

// ============================================================================
// Convenient re-exports from fluxon_core
// ============================================================================

pub use fluxon_core::{
    // Errors
    Error as CoreError,
    ErrorKind,
    // Constants
    FLUX_QUANTUM,
    HBAR,
    // Nodal equations
    NodalSystem,
    NodeId,
    PHI0_BAR,
    PhaseState,
};

// ============================================================================
// Convenient re-exports from fluxon_devices
// ============================================================================

pub use fluxon_devices::{
    Capacitor,
    Circuit,
    CurrentBias,
    Device,
    Element,
    ElementKind,
    // Errors
    Error as DeviceError,
    Inductor,
    Junction,
    Mutual,
    Observable,
    Parameter,
    Resistor,
    Stamp,
};

// ============================================================================
// Convenient re-exports from fluxon_solver
// ============================================================================

pub use fluxon_solver::{
    Dynamics,
    // Errors
    Error as SolverError,
    Extrema,
    FixedPoint,
    FixedPointCriteria,
    IntegrationStats,
    IntegratorConfig,
    Quantity,
    QubitParameters,
    RootCriteria,
    // Interactive front end
    Session,
    TimePoint,
    Trajectory,
    WellPair,
    // Analyses
    simulate,
    solve_fixed_point,
};

/// Re-export of nalgebra's dynamic vector type.
pub use nalgebra::DVector;

/// Re-export of nalgebra's dynamic matrix type.
pub use nalgebra::DMatrix;

/// Prelude module containing commonly used types.
///
/// ```rust
/// use fluxon::prelude::*;
/// ```
pub mod prelude {
    // Circuit
    pub use crate::{Circuit, Element, NodeId, Parameter};

    // Devices
    pub use crate::{Capacitor, CurrentBias, Inductor, Junction, Mutual, Resistor};

    // Analyses
    pub use crate::{
        Dynamics, FixedPointCriteria, IntegratorConfig, Quantity, QubitParameters, Session,
        Trajectory, simulate, solve_fixed_point,
    };

    // Constants
    pub use crate::{FLUX_QUANTUM, HBAR, PHI0_BAR};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let c = Capacitor::new(1e-15, NodeId::new(0), NodeId::GROUND);
        assert_eq!(c.capacitance, 1e-15);
        assert!((FLUX_QUANTUM / PHI0_BAR - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_error_kinds_line_up() {
        let mut session = Session::new(1);
        let err = session.add_mutual("M", 1e-12, "L1", "L2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
