//! Independent source models.

use fluxon_core::{NodalSystem, NodeId, PhaseState};

use crate::stamp::{Observable, Stamp, node_to_index};

/// A constant current bias driven from ground into one node.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentBias {
    /// Node the current is driven into.
    pub node: NodeId,
    /// Current value in amperes.
    pub current: f64,
}

impl CurrentBias {
    /// Create a new current bias.
    pub fn new(current: f64, node: NodeId) -> Self {
        Self { node, current }
    }
}

impl Stamp for CurrentBias {
    fn stamp_current(&self, sys: &mut NodalSystem, _state: &PhaseState) {
        sys.stamp_current_source(None, node_to_index(self.node), self.current);
    }
}

impl Observable for CurrentBias {
    fn energy(&self, _state: &PhaseState) -> f64 {
        0.0
    }

    fn current(&self, _state: &PhaseState) -> Option<f64> {
        Some(self.current)
    }

    fn phase(&self, state: &PhaseState) -> Option<f64> {
        Some(state.phase(self.node))
    }

    fn voltage(&self, state: &PhaseState) -> Option<f64> {
        Some(state.voltage(self.node, NodeId::GROUND))
    }

    fn nodes(&self) -> Vec<NodeId> {
        vec![self.node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_bias_drives_into_node() {
        let bias = CurrentBias::new(1e-6, NodeId::new(1));
        let phases = [0.0, 0.7];
        let velocities = [0.0, 0.0];
        let state = PhaseState::new(&phases, &velocities).unwrap();

        let mut sys = NodalSystem::new(2);
        bias.stamp_current(&mut sys, &state);

        assert_eq!(sys.rhs[0], 0.0);
        assert_eq!(sys.rhs[1], 1e-6);
        assert_eq!(bias.phase(&state), Some(0.7));
        assert_eq!(bias.energy(&state), 0.0);
    }
}
