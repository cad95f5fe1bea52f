//! Josephson junction model.
//!
//! An ideal junction carries the supercurrent `I = I0·sin(Δφ)` and stores the
//! Josephson energy `-E_J·cos(Δφ)` with `E_J = (ħ/2e)·I0`. Junction
//! capacitance is not included; add a parallel [`Capacitor`](crate::Capacitor).

use fluxon_core::{NodalSystem, NodeId, PHI0_BAR, PhaseState};

use crate::stamp::{Observable, Stamp, node_to_index};

/// A Josephson junction element.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Positive terminal node.
    pub node_pos: NodeId,
    /// Negative terminal node.
    pub node_neg: NodeId,
    /// Critical current in amperes.
    pub critical_current: f64,
}

impl Junction {
    /// Create a new junction.
    pub fn new(critical_current: f64, node_pos: NodeId, node_neg: NodeId) -> Self {
        Self {
            node_pos,
            node_neg,
            critical_current,
        }
    }

    /// Josephson energy E_J (J).
    pub fn josephson_energy(&self) -> f64 {
        PHI0_BAR * self.critical_current
    }
}

impl Stamp for Junction {
    fn stamp_current(&self, sys: &mut NodalSystem, state: &PhaseState) {
        let i = node_to_index(self.node_pos);
        let j = node_to_index(self.node_neg);
        let delta = state.phase_diff(self.node_pos, self.node_neg);
        sys.stamp_current_source(i, j, self.critical_current * delta.sin());
    }

    fn stamp_stiffness(&self, sys: &mut NodalSystem, state: &PhaseState) {
        let i = node_to_index(self.node_pos);
        let j = node_to_index(self.node_neg);
        let delta = state.phase_diff(self.node_pos, self.node_neg);
        sys.stamp_conductance(i, j, self.critical_current * delta.cos());
    }
}

impl Observable for Junction {
    fn energy(&self, state: &PhaseState) -> f64 {
        -self.josephson_energy() * state.phase_diff(self.node_pos, self.node_neg).cos()
    }

    fn current(&self, state: &PhaseState) -> Option<f64> {
        Some(self.critical_current * state.phase_diff(self.node_pos, self.node_neg).sin())
    }

    fn phase(&self, state: &PhaseState) -> Option<f64> {
        Some(state.phase_diff(self.node_pos, self.node_neg))
    }

    fn voltage(&self, state: &PhaseState) -> Option<f64> {
        Some(state.voltage(self.node_pos, self.node_neg))
    }

    fn nodes(&self) -> Vec<NodeId> {
        vec![self.node_pos, self.node_neg]
    }
}
