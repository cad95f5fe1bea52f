//! Passive device models: Capacitor, Inductor, Resistor.

use fluxon_core::{NodalSystem, NodeId, PHI0_BAR, PhaseState};

use crate::stamp::{Observable, Stamp, node_to_index};

/// A capacitor element.
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    /// Positive terminal node.
    pub node_pos: NodeId,
    /// Negative terminal node.
    pub node_neg: NodeId,
    /// Capacitance value in farads.
    pub capacitance: f64,
}

impl Capacitor {
    /// Create a new capacitor.
    pub fn new(capacitance: f64, node_pos: NodeId, node_neg: NodeId) -> Self {
        Self {
            node_pos,
            node_neg,
            capacitance,
        }
    }
}

impl Stamp for Capacitor {
    fn stamp_capacitance(&self, sys: &mut NodalSystem) {
        let i = node_to_index(self.node_pos);
        let j = node_to_index(self.node_neg);
        sys.stamp_conductance(i, j, self.capacitance);
    }

    fn stamp_current(&self, _sys: &mut NodalSystem, _state: &PhaseState) {
        // Displacement current is the inertia term, carried by the capacitance matrix.
    }
}

impl Observable for Capacitor {
    fn energy(&self, state: &PhaseState) -> f64 {
        let v = state.voltage(self.node_pos, self.node_neg);
        0.5 * self.capacitance * v * v
    }

    fn current(&self, state: &PhaseState) -> Option<f64> {
        let accel = state.acceleration_diff(self.node_pos, self.node_neg)?;
        Some(self.capacitance * PHI0_BAR * accel)
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

/// An inductor element with a flux bias.
///
/// The bias is a phase offset: one flux quantum of applied flux is a bias
/// of 2π, and the inductor carries no current when Δφ equals the bias.
#[derive(Debug, Clone, PartialEq)]
pub struct Inductor {
    /// Positive terminal node.
    pub node_pos: NodeId,
    /// Negative terminal node.
    pub node_neg: NodeId,
    /// Inductance value in henries.
    pub inductance: f64,
    /// Bias phase (rad).
    pub bias: f64,
}

impl Inductor {
    /// Create a new inductor.
    pub fn new(inductance: f64, node_pos: NodeId, node_neg: NodeId, bias: f64) -> Self {
        Self {
            node_pos,
            node_neg,
            inductance,
            bias,
        }
    }

    fn branch_current(&self, state: &PhaseState) -> f64 {
        PHI0_BAR * (state.phase_diff(self.node_pos, self.node_neg) - self.bias) / self.inductance
    }
}

impl Stamp for Inductor {
    fn stamp_current(&self, sys: &mut NodalSystem, state: &PhaseState) {
        let i = node_to_index(self.node_pos);
        let j = node_to_index(self.node_neg);
        sys.stamp_current_source(i, j, self.branch_current(state));
    }

    fn stamp_stiffness(&self, sys: &mut NodalSystem, _state: &PhaseState) {
        let i = node_to_index(self.node_pos);
        let j = node_to_index(self.node_neg);
        sys.stamp_conductance(i, j, PHI0_BAR / self.inductance);
    }
}

impl Observable for Inductor {
    fn energy(&self, state: &PhaseState) -> f64 {
        let i = self.branch_current(state);
        0.5 * self.inductance * i * i
    }

    fn current(&self, state: &PhaseState) -> Option<f64> {
        Some(self.branch_current(state))
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

/// A resistor element.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    /// Positive terminal node.
    pub node_pos: NodeId,
    /// Negative terminal node.
    pub node_neg: NodeId,
    /// Resistance value in ohms.
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(resistance: f64, node_pos: NodeId, node_neg: NodeId) -> Self {
        Self {
            node_pos,
            node_neg,
            resistance,
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

impl Stamp for Resistor {
    fn stamp_current(&self, sys: &mut NodalSystem, state: &PhaseState) {
        let i = node_to_index(self.node_pos);
        let j = node_to_index(self.node_neg);
        let current = state.voltage(self.node_pos, self.node_neg) * self.conductance();
        sys.stamp_current_source(i, j, current);
    }
}

impl Observable for Resistor {
    /// A resistor stores nothing; its energy over a run is the integral of [`Observable::power`].
    fn energy(&self, _state: &PhaseState) -> f64 {
        0.0
    }

    fn power(&self, state: &PhaseState) -> f64 {
        let v = state.voltage(self.node_pos, self.node_neg);
        v * v * self.conductance()
    }

    fn current(&self, state: &PhaseState) -> Option<f64> {
        Some(state.voltage(self.node_pos, self.node_neg) * self.conductance())
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
