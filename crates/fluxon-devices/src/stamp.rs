//! Nodal stamping and observable traits.

use fluxon_core::{NodalSystem, NodeId, PhaseState};

/// Trait for devices that contribute to the equations of motion.
///
/// The equations read `(ħ/2e)·C·φ̈ = I(φ, φ̇)`: capacitors fill the
/// capacitance matrix, every other element injects current into the RHS.
pub trait Stamp {
    /// Stamp capacitance (F) into the coefficient matrix.
    fn stamp_capacitance(&self, _sys: &mut NodalSystem) {}

    /// Stamp the current this device drives into each node (A).
    fn stamp_current(&self, sys: &mut NodalSystem, state: &PhaseState);

    /// Stamp ∂I_out/∂φ, the derivative of the current leaving each node
    /// with respect to the node phases (A/rad).
    fn stamp_stiffness(&self, _sys: &mut NodalSystem, _state: &PhaseState) {}
}

/// Quantities a device reports at one instant.
pub trait Observable {
    /// Energy stored in the device (J).
    fn energy(&self, state: &PhaseState) -> f64;

    /// Power dissipated by the device (W).
    fn power(&self, _state: &PhaseState) -> f64 {
        0.0
    }

    /// Current through the device from its positive to its negative terminal (A).
    fn current(&self, state: &PhaseState) -> Option<f64>;

    /// Phase across the device (rad).
    fn phase(&self, state: &PhaseState) -> Option<f64>;

    /// Voltage across the device (V).
    fn voltage(&self, state: &PhaseState) -> Option<f64>;

    /// Nodes the device touches.
    fn nodes(&self) -> Vec<NodeId>;
}

/// Convert a node to its nodal matrix index (None for ground).
pub(crate) fn node_to_index(node: NodeId) -> Option<usize> {
    node.index()
}
