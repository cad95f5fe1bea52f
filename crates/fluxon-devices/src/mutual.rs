//! Mutual inductance between two inductors.
//!
//! A mutual does not connect nodes of its own. It couples the branches of two
//! existing inductors and keeps a copy of their terminals and inductances,
//! taken when the mutual is built. Replacing either inductor afterwards does
//! not change the coupling.
//!
//! The coupling energy is `-M·i₁·i₂` with `iₖ = (ħ/2e)·Δφₖ/Lₖ`, the
//! first-order term of the inverse inductance matrix.

use fluxon_core::{NodalSystem, NodeId, PHI0_BAR, PhaseState};

use crate::passive::Inductor;
use crate::stamp::{Observable, Stamp, node_to_index};

/// Mutual inductance coupling between two inductors.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutual {
    /// Mutual inductance M in henries.
    pub mutual_inductance: f64,
    /// Label of the first inductor.
    pub first: String,
    /// Label of the second inductor.
    pub second: String,
    /// Terminals of the first inductor (snapshot).
    pub first_nodes: (NodeId, NodeId),
    /// Terminals of the second inductor (snapshot).
    pub second_nodes: (NodeId, NodeId),
    /// Inductance of the first inductor (snapshot).
    pub first_inductance: f64,
    /// Inductance of the second inductor (snapshot).
    pub second_inductance: f64,
}

impl Mutual {
    /// Couple two inductors, copying their terminals and inductances.
    pub fn between(
        mutual_inductance: f64,
        first: impl Into<String>,
        first_inductor: &Inductor,
        second: impl Into<String>,
        second_inductor: &Inductor,
    ) -> Self {
        Self {
            mutual_inductance,
            first: first.into(),
            second: second.into(),
            first_nodes: (first_inductor.node_pos, first_inductor.node_neg),
            second_nodes: (second_inductor.node_pos, second_inductor.node_neg),
            first_inductance: first_inductor.inductance,
            second_inductance: second_inductor.inductance,
        }
    }

    /// Coupling coefficient k = M / sqrt(L1·L2).
    pub fn coupling_coefficient(&self) -> f64 {
        self.mutual_inductance / (self.first_inductance * self.second_inductance).sqrt()
    }

    /// Check whether the mutual references the given inductor label.
    pub fn references(&self, label: &str) -> bool {
        self.first == label || self.second == label
    }

    /// Coupling conductance g = -M·(ħ/2e)/(L1·L2) (A/rad).
    fn coupling(&self) -> f64 {
        -self.mutual_inductance * PHI0_BAR / (self.first_inductance * self.second_inductance)
    }

    fn branch_indices(nodes: (NodeId, NodeId)) -> (Option<usize>, Option<usize>) {
        (node_to_index(nodes.0), node_to_index(nodes.1))
    }

    /// Uncoupled branch currents (i₁, i₂) implied by the branch phases.
    fn branch_currents(&self, state: &PhaseState) -> (f64, f64) {
        let d1 = state.phase_diff(self.first_nodes.0, self.first_nodes.1);
        let d2 = state.phase_diff(self.second_nodes.0, self.second_nodes.1);
        (
            PHI0_BAR * d1 / self.first_inductance,
            PHI0_BAR * d2 / self.second_inductance,
        )
    }
}

impl Stamp for Mutual {
    fn stamp_current(&self, sys: &mut NodalSystem, state: &PhaseState) {
        let g = self.coupling();
        let d1 = state.phase_diff(self.first_nodes.0, self.first_nodes.1);
        let d2 = state.phase_diff(self.second_nodes.0, self.second_nodes.1);

        let (i, j) = Self::branch_indices(self.first_nodes);
        sys.stamp_current_source(i, j, g * d2);
        let (k, l) = Self::branch_indices(self.second_nodes);
        sys.stamp_current_source(k, l, g * d1);
    }

    fn stamp_stiffness(&self, sys: &mut NodalSystem, _state: &PhaseState) {
        sys.stamp_coupling(
            Self::branch_indices(self.first_nodes),
            Self::branch_indices(self.second_nodes),
            self.coupling(),
        );
    }
}

impl Observable for Mutual {
    fn energy(&self, state: &PhaseState) -> f64 {
        let (i1, i2) = self.branch_currents(state);
        -self.mutual_inductance * i1 * i2
    }

    fn current(&self, _state: &PhaseState) -> Option<f64> {
        None
    }

    fn phase(&self, _state: &PhaseState) -> Option<f64> {
        None
    }

    fn voltage(&self, _state: &PhaseState) -> Option<f64> {
        None
    }

    fn nodes(&self) -> Vec<NodeId> {
        vec![
            self.first_nodes.0,
            self.first_nodes.1,
            self.second_nodes.0,
            self.second_nodes.1,
        ]
    }
}
