//! Instantaneous node-phase snapshots.

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::units::PHI0_BAR;

/// Node phases and their time derivatives at one instant.
///
/// Ground reads as zero phase, zero velocity and zero acceleration.
#[derive(Debug, Clone, Copy)]
pub struct PhaseState<'a> {
    phases: &'a [f64],
    velocities: &'a [f64],
    accelerations: Option<&'a [f64]>,
}

impl<'a> PhaseState<'a> {
    /// Snapshot of phases (rad) and phase velocities (rad/s).
    pub fn new(phases: &'a [f64], velocities: &'a [f64]) -> Result<Self> {
        if phases.len() != velocities.len() {
            return Err(Error::DimensionMismatch {
                expected: phases.len(),
                actual: velocities.len(),
            });
        }
        Ok(Self {
            phases,
            velocities,
            accelerations: None,
        })
    }

    /// Attach phase accelerations (rad/s²), needed for capacitor currents.
    pub fn with_accelerations(mut self, accelerations: &'a [f64]) -> Result<Self> {
        if accelerations.len() != self.phases.len() {
            return Err(Error::DimensionMismatch {
                expected: self.phases.len(),
                actual: accelerations.len(),
            });
        }
        self.accelerations = Some(accelerations);
        Ok(self)
    }

    /// Number of nodes in the snapshot.
    pub fn num_nodes(&self) -> usize {
        self.phases.len()
    }

    /// Phase of a node.
    pub fn phase(&self, node: NodeId) -> f64 {
        node.index().map_or(0.0, |i| self.phases[i])
    }

    /// Phase velocity of a node.
    pub fn velocity(&self, node: NodeId) -> f64 {
        node.index().map_or(0.0, |i| self.velocities[i])
    }

    /// Phase acceleration of a node, if accelerations were attached.
    pub fn acceleration(&self, node: NodeId) -> Option<f64> {
        let accelerations = self.accelerations?;
        Some(node.index().map_or(0.0, |i| accelerations[i]))
    }

    /// Phase difference φ(pos) − φ(neg).
    pub fn phase_diff(&self, pos: NodeId, neg: NodeId) -> f64 {
        self.phase(pos) - self.phase(neg)
    }

    /// Velocity difference φ̇(pos) − φ̇(neg).
    pub fn velocity_diff(&self, pos: NodeId, neg: NodeId) -> f64 {
        self.velocity(pos) - self.velocity(neg)
    }

    /// Acceleration difference φ̈(pos) − φ̈(neg).
    pub fn acceleration_diff(&self, pos: NodeId, neg: NodeId) -> Option<f64> {
        Some(self.acceleration(pos)? - self.acceleration(neg)?)
    }

    /// Voltage across a node pair, (ħ/2e)·Δφ̇.
    pub fn voltage(&self, pos: NodeId, neg: NodeId) -> f64 {
        PHI0_BAR * self.velocity_diff(pos, neg)
    }
}
