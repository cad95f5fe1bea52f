//! Equations of motion for a circuit of superconducting elements.
//!
//! Kirchhoff's current law at every node, written in terms of node phases:
//!
//! ```text
//! (ħ/2e)·C·φ̈ = I(φ, φ̇)
//! ```
//!
//! `C` is the nodal capacitance matrix and `I` the net current driven into
//! each node by junctions, inductors, mutual couplings, resistors and current
//! biases. `C` is assembled and factored once; every evaluation afterwards is
//! a pure function of the state.

use nalgebra::{DMatrix, DVector, Dyn, LU};

use fluxon_core::{NodalSystem, PHI0_BAR, PhaseState};
use fluxon_devices::{Circuit, Element};

use crate::error::{Error, Result, check_len};
use crate::integrator::OdeSystem;

/// Smallest pivot of the factored capacitance matrix, relative to the
/// largest diagonal entry, that still counts as non-singular.
const SINGULAR_PIVOT_RATIO: f64 = 1e-12;

/// Net and gross current at each node.
#[derive(Debug, Clone)]
pub struct CurrentBalance {
    /// Net current driven into each node by non-capacitive elements (A).
    pub net: Vec<f64>,
    /// Sum of the magnitudes of every element's contribution at each node (A).
    pub gross: Vec<f64>,
}

impl CurrentBalance {
    /// First node where `|net| > reltol·gross + abstol`, if any.
    pub fn violation(&self, reltol: f64, abstol: f64) -> Option<usize> {
        self.net
            .iter()
            .zip(&self.gross)
            .position(|(net, gross)| net.abs() > reltol * gross + abstol)
    }
}

/// Compiled equations of motion for one circuit.
pub struct Dynamics<'c> {
    circuit: &'c Circuit,
    capacitance: DMatrix<f64>,
    lu: LU<f64, Dyn, Dyn>,
}

impl<'c> Dynamics<'c> {
    /// Assemble and factor the capacitance matrix of `circuit`.
    ///
    /// Fails if a node has no incident capacitance or the capacitance matrix
    /// is singular (a capacitor network with no path to ground).
    pub fn new(circuit: &'c Circuit) -> Result<Self> {
        let n = circuit.num_nodes();
        let mut sys = NodalSystem::new(n);
        for element in circuit.elements() {
            element.device().stamp_capacitance(&mut sys);
        }
        let capacitance = sys.into_matrix();

        if let Some(node) = (0..n).find(|&i| capacitance[(i, i)] == 0.0) {
            return Err(Error::DegenerateNode(node));
        }

        let lu = capacitance.clone().lu();
        let scale = capacitance.diagonal().amax();
        let pivot = lu.u().diagonal().amin();
        if n > 0 && (!lu.is_invertible() || pivot <= SINGULAR_PIVOT_RATIO * scale) {
            return Err(Error::SingularCapacitance);
        }

        log::debug!("compiled equations of motion for {} nodes", n);
        Ok(Self {
            circuit,
            capacitance,
            lu,
        })
    }

    /// Get the number of nodes (excluding ground).
    pub fn num_nodes(&self) -> usize {
        self.circuit.num_nodes()
    }

    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    /// Nodal capacitance matrix (F).
    pub fn capacitance(&self) -> &DMatrix<f64> {
        &self.capacitance
    }

    fn state<'a>(&self, phases: &'a [f64], velocities: &'a [f64]) -> Result<PhaseState<'a>> {
        check_len(self.num_nodes(), phases.len())?;
        check_len(self.num_nodes(), velocities.len())?;
        Ok(PhaseState::new(phases, velocities)?)
    }

    /// Net current driven into each node by non-capacitive elements (A).
    pub fn currents(&self, phases: &[f64], velocities: &[f64]) -> Result<DVector<f64>> {
        let state = self.state(phases, velocities)?;
        let mut sys = NodalSystem::new(self.num_nodes());
        for element in self.circuit.elements() {
            element.device().stamp_current(&mut sys, &state);
        }
        Ok(sys.into_rhs())
    }

    /// Phase accelerations φ̈ (rad/s²).
    pub fn accelerations(&self, phases: &[f64], velocities: &[f64]) -> Result<DVector<f64>> {
        let currents = self.currents(phases, velocities)?;
        let accelerations = self.lu.solve(&currents).ok_or(Error::SingularCapacitance)?;
        Ok(accelerations / PHI0_BAR)
    }

    /// First-order form: maps `[φ; φ̇]` to `[φ̇; φ̈]`.
    pub fn derivative(&self, state: &[f64]) -> Result<Vec<f64>> {
        let n = self.num_nodes();
        check_len(2 * n, state.len())?;
        let (phases, velocities) = state.split_at(n);
        let accelerations = self.accelerations(phases, velocities)?;

        let mut out = Vec::with_capacity(2 * n);
        out.extend_from_slice(velocities);
        out.extend(accelerations.iter());
        Ok(out)
    }

    /// Net and gross current per node.
    ///
    /// The net current is what the capacitors must carry; at a fixed point
    /// it vanishes at every node.
    pub fn current_balance(&self, phases: &[f64], velocities: &[f64]) -> Result<CurrentBalance> {
        let state = self.state(phases, velocities)?;
        let n = self.num_nodes();
        let mut scratch = NodalSystem::new(n);
        let mut net = vec![0.0; n];
        let mut gross = vec![0.0; n];

        for element in self.circuit.elements() {
            scratch.rhs.fill(0.0);
            element.device().stamp_current(&mut scratch, &state);
            for (i, current) in scratch.rhs.iter().enumerate() {
                net[i] += current;
                gross[i] += current.abs();
            }
        }
        Ok(CurrentBalance { net, gross })
    }

    /// Stiffness matrix K = ∂I_out/∂φ at zero velocity (A/rad).
    pub fn stiffness(&self, phases: &[f64]) -> Result<DMatrix<f64>> {
        let velocities = vec![0.0; phases.len()];
        let state = self.state(phases, &velocities)?;
        let mut sys = NodalSystem::new(self.num_nodes());
        for element in self.circuit.elements() {
            element.device().stamp_stiffness(&mut sys, &state);
        }
        Ok(sys.into_matrix())
    }

    /// Jacobian of the accelerations with respect to the phases at zero
    /// velocity: `∂φ̈/∂φ = -C⁻¹·K/(ħ/2e)`.
    pub fn jacobian(&self, phases: &[f64]) -> Result<DMatrix<f64>> {
        let stiffness = self.stiffness(phases)?;
        let solved = self.lu.solve(&stiffness).ok_or(Error::SingularCapacitance)?;
        Ok(solved / -PHI0_BAR)
    }

    /// Energy stored in all elements at one instant (J).
    pub fn stored_energy(&self, phases: &[f64], velocities: &[f64]) -> Result<f64> {
        let state = self.state(phases, velocities)?;
        Ok(self
            .circuit
            .elements()
            .map(|element| element.device().energy(&state))
            .sum())
    }

    /// Whether the circuit can dissipate or inject energy.
    pub fn is_lossless(&self) -> bool {
        self.circuit
            .elements()
            .all(|e| !matches!(e, Element::Resistor(_) | Element::CurrentBias(_)))
    }
}

impl OdeSystem for Dynamics<'_> {
    fn dimension(&self) -> usize {
        2 * self.num_nodes()
    }

    fn derivative(&self, _t: f64, y: &[f64], dy: &mut [f64]) -> Result<()> {
        let n = self.num_nodes();
        check_len(2 * n, y.len())?;
        check_len(2 * n, dy.len())?;
        let (phases, velocities) = y.split_at(n);
        let accelerations = self.accelerations(phases, velocities)?;
        dy[..n].copy_from_slice(velocities);
        dy[n..].copy_from_slice(accelerations.as_slice());
        Ok(())
    }
}
