//! Nodal matrix structures.

use nalgebra::{DMatrix, DVector};

/// Nodal system: a square node-by-node matrix plus a per-node current vector.
///
/// The same structure holds the capacitance matrix, the stiffness matrix
/// (∂I/∂φ) and the net current injected into each node. Ground never gets a
/// row; stamps touching ground simply drop that terminal.
#[derive(Debug, Clone)]
pub struct NodalSystem {
    /// The node-by-node coefficient matrix.
    pub matrix: DMatrix<f64>,
    /// Net current flowing into each node (A).
    pub rhs: DVector<f64>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
}

impl NodalSystem {
    /// Create a zeroed system for `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(num_nodes, num_nodes),
            rhs: DVector::zeros(num_nodes),
            num_nodes,
        }
    }

    /// Get the total size of the system.
    pub fn size(&self) -> usize {
        self.num_nodes
    }

    /// Clear the matrix and RHS to zeros.
    pub fn clear(&mut self) {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);
    }

    /// Stamp a two-terminal admittance-like coefficient between two nodes.
    ///
    /// For a coefficient G between nodes i and j:
    /// - A[i,i] += G
    /// - A[j,j] += G
    /// - A[i,j] -= G
    /// - A[j,i] -= G
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        if let Some(i) = node_i {
            self.matrix[(i, i)] += g;
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += g;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= g;
            self.matrix[(j, i)] -= g;
        }
    }

    /// Stamp a symmetric coupling between two node pairs.
    ///
    /// Couples branch a = (a_pos, a_neg) to branch b = (b_pos, b_neg): the
    /// coefficient enters with sign +G where both terminals have the same
    /// polarity and -G otherwise, in both the (a, b) and (b, a) blocks.
    pub fn stamp_coupling(
        &mut self,
        a: (Option<usize>, Option<usize>),
        b: (Option<usize>, Option<usize>),
        g: f64,
    ) {
        let terminals = |(pos, neg): (Option<usize>, Option<usize>)| {
            [(pos, 1.0), (neg, -1.0)]
        };
        for (row, row_sign) in terminals(a) {
            let Some(r) = row else { continue };
            for (col, col_sign) in terminals(b) {
                let Some(c) = col else { continue };
                let value = row_sign * col_sign * g;
                self.matrix[(r, c)] += value;
                self.matrix[(c, r)] += value;
            }
        }
    }

    /// Stamp a current source from node i to node j.
    ///
    /// Current flows from node i to node j (positive current enters node j).
    pub fn stamp_current_source(
        &mut self,
        node_i: Option<usize>,
        node_j: Option<usize>,
        current: f64,
    ) {
        if let Some(i) = node_i {
            self.rhs[i] -= current;
        }
        if let Some(j) = node_j {
            self.rhs[j] += current;
        }
    }

    /// Get a reference to the coefficient matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Get a reference to the RHS vector.
    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// Consume the system, returning the coefficient matrix.
    pub fn into_matrix(self) -> DMatrix<f64> {
        self.matrix
    }

    /// Consume the system, returning the current vector.
    pub fn into_rhs(self) -> DVector<f64> {
        self.rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_system() {
        let sys = NodalSystem::new(3);
        assert_eq!(sys.size(), 3);
        assert_eq!(sys.matrix().nrows(), 3);
        assert_eq!(sys.rhs().len(), 3);
    }

    #[test]
    fn test_stamp_conductance() {
        let mut sys = NodalSystem::new(2);

        sys.stamp_conductance(Some(0), Some(1), 1.0);

        assert_eq!(sys.matrix[(0, 0)], 1.0);
        assert_eq!(sys.matrix[(1, 1)], 1.0);
        assert_eq!(sys.matrix[(0, 1)], -1.0);
        assert_eq!(sys.matrix[(1, 0)], -1.0);
    }

    #[test]
    fn test_stamp_conductance_to_ground() {
        let mut sys = NodalSystem::new(2);

        sys.stamp_conductance(Some(0), None, 1.0);

        assert_eq!(sys.matrix[(0, 0)], 1.0);
        assert_eq!(sys.matrix[(1, 1)], 0.0);
    }

    #[test]
    fn test_stamp_coupling_between_grounded_branches() {
        let mut sys = NodalSystem::new(2);

        sys.stamp_coupling((Some(0), None), (Some(1), None), 2.0);

        assert_eq!(sys.matrix[(0, 1)], 2.0);
        assert_eq!(sys.matrix[(1, 0)], 2.0);
        assert_eq!(sys.matrix[(0, 0)], 0.0);
        assert_eq!(sys.matrix[(1, 1)], 0.0);
    }

    #[test]
    fn test_stamp_coupling_floating_branches() {
        let mut sys = NodalSystem::new(4);

        sys.stamp_coupling((Some(0), Some(1)), (Some(2), Some(3)), 1.0);

        assert_eq!(sys.matrix[(0, 2)], 1.0);
        assert_eq!(sys.matrix[(0, 3)], -1.0);
        assert_eq!(sys.matrix[(1, 2)], -1.0);
        assert_eq!(sys.matrix[(1, 3)], 1.0);
        assert_eq!(sys.matrix, sys.matrix.transpose());
    }

    #[test]
    fn test_stamp_current_source() {
        let mut sys = NodalSystem::new(2);

        // 1A current source from ground to node 0
        sys.stamp_current_source(None, Some(0), 1.0);

        assert_eq!(sys.rhs[0], 1.0);
        assert_eq!(sys.rhs[1], 0.0);
    }
}
