//! Fixed points of the equations of motion.
//!
//! A fixed point is a set of node phases at which every acceleration vanishes
//! with the circuit at rest. It is found by Levenberg–Marquardt least squares
//! on `φ̈(φ, 0)` with the analytic Jacobian, then checked against Kirchhoff's
//! current law node by node.

use nalgebra::{DMatrix, DVector};

use crate::dynamics::Dynamics;
use crate::error::{Error, Result, check_len};
use crate::linear::solve_dense;

/// Convergence criteria for the fixed-point search.
#[derive(Debug, Clone)]
pub struct FixedPointCriteria {
    /// Stop when the actual and predicted relative reductions of the squared
    /// residual are both below this.
    pub ftol: f64,
    /// Stop when the relative step length is below this.
    pub xtol: f64,
    /// Maximum iterations before failure.
    pub max_iterations: usize,
    /// Relative current tolerance for the node-by-node balance check.
    pub reltol: f64,
    /// Absolute current tolerance for the node-by-node balance check (A).
    pub abstol: f64,
}

impl Default for FixedPointCriteria {
    fn default() -> Self {
        Self {
            ftol: 1e-12,
            xtol: 1e-12,
            max_iterations: 200,
            reltol: 1e-6,
            abstol: 1e-15,
        }
    }
}

/// Result of a fixed-point search.
#[derive(Debug, Clone)]
pub struct FixedPoint {
    /// Node phases at rest (rad).
    pub phases: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Euclidean norm of the accelerations at the result (rad/s²).
    pub residual: f64,
}

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-15;
const LAMBDA_MAX: f64 = 1e20;

fn residual(dynamics: &Dynamics<'_>, phases: &DVector<f64>) -> Result<DVector<f64>> {
    let rest = vec![0.0; phases.len()];
    dynamics.accelerations(phases.as_slice(), &rest)
}

/// Search for a fixed point starting from `guess`.
pub fn solve_fixed_point(
    dynamics: &Dynamics<'_>,
    guess: &[f64],
    criteria: &FixedPointCriteria,
) -> Result<FixedPoint> {
    let n = dynamics.num_nodes();
    check_len(n, guess.len())?;

    let mut x = DVector::from_column_slice(guess);
    let mut r = residual(dynamics, &x)?;
    let mut cost = r.norm_squared();
    let mut lambda = LAMBDA_INIT;
    let mut scale = DVector::<f64>::zeros(n);
    let mut converged = cost == 0.0;
    let mut iterations = 0;

    while !converged && iterations < criteria.max_iterations {
        iterations += 1;
        let jac = dynamics.jacobian(x.as_slice())?;
        let jtj = jac.transpose() * &jac;
        let gradient = jac.transpose() * &r;

        // Marquardt scaling: running maximum of the column norms.
        for i in 0..n {
            scale[i] = scale[i].max(jtj[(i, i)]);
        }
        let damping = scale.map(|d| if d > 0.0 { d } else { 1.0 });

        loop {
            let damped: DMatrix<f64> = &jtj + DMatrix::from_diagonal(&(&damping * lambda));
            let step = solve_dense(&damped, &(-&gradient))?;

            let trial = &x + &step;
            let r_trial = residual(dynamics, &trial)?;
            let cost_trial = r_trial.norm_squared();
            let predicted_residual = &r + &jac * &step;

            let actual = 1.0 - cost_trial / cost;
            let predicted = 1.0 - predicted_residual.norm_squared() / cost;
            let step_small =
                step.norm() <= criteria.xtol * (x.norm() + criteria.xtol);

            let accepted = cost_trial.is_finite() && cost_trial < cost;
            if accepted {
                x = trial;
                r = r_trial;
                cost = cost_trial;
                lambda = (lambda / 10.0).max(LAMBDA_MIN);
            } else {
                lambda *= 10.0;
            }

            log::debug!(
                "fixed point iteration {}: |r| = {:e}, lambda = {:e}, {}",
                iterations,
                cost.sqrt(),
                lambda,
                if accepted { "accepted" } else { "rejected" }
            );

            if cost == 0.0
                || step_small
                || (actual.abs() <= criteria.ftol && predicted <= criteria.ftol && actual <= 2.0 * predicted)
            {
                converged = true;
                break;
            }
            if accepted {
                break;
            }
            if lambda > LAMBDA_MAX {
                return Err(Error::ConvergenceFailed {
                    method: "fixed point",
                    iterations,
                });
            }
        }
    }

    if !converged {
        return Err(Error::ConvergenceFailed {
            method: "fixed point",
            iterations,
        });
    }

    let phases: Vec<f64> = x.iter().copied().collect();
    let balance = dynamics.current_balance(&phases, &vec![0.0; n])?;
    if let Some(node) = balance.violation(criteria.reltol, criteria.abstol) {
        log::warn!(
            "fixed point search stopped at a point violating current balance at node {}",
            node
        );
        return Err(Error::CurrentImbalance {
            node,
            net: balance.net[node],
            gross: balance.gross[node],
        });
    }

    log::info!(
        "fixed point found in {} iterations, residual {:e}",
        iterations,
        cost.sqrt()
    );
    Ok(FixedPoint {
        phases,
        iterations,
        residual: cost.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use fluxon_core::{NodeId, PHI0_BAR};
    use fluxon_devices::{Capacitor, Circuit, CurrentBias, Inductor, Junction};

    use super::*;

    const GND: NodeId = NodeId::GROUND;

    #[test]
    fn test_current_biased_inductor() {
        let mut circuit = Circuit::new(1);
        circuit.set("C", Capacitor::new(1e-15, NodeId::new(0), GND)).unwrap();
        circuit.set("L", Inductor::new(1e-9, NodeId::new(0), GND, 0.0)).unwrap();
        circuit.set("I", CurrentBias::new(1e-7, NodeId::new(0))).unwrap();
        let dynamics = Dynamics::new(&circuit).unwrap();

        let fp = solve_fixed_point(&dynamics, &[0.0], &FixedPointCriteria::default()).unwrap();
        let expected = 1e-9 * 1e-7 / PHI0_BAR;
        assert!((fp.phases[0] - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn test_rf_squid_left_well() {
        let mut circuit = Circuit::new(1);
        circuit.set("C", Capacitor::new(1e-15, NodeId::new(0), GND)).unwrap();
        circuit.set("J", Junction::new(1e-6, NodeId::new(0), GND)).unwrap();
        circuit.set("L", Inductor::new(1e-9, NodeId::new(0), GND, PI)).unwrap();
        let dynamics = Dynamics::new(&circuit).unwrap();

        let fp = solve_fixed_point(&dynamics, &[0.5], &FixedPointCriteria::default()).unwrap();
        // 2E_L(δ - π) + E_J sin δ = 0 with β = E_J/2E_L ≈ 3.04
        let beta = 1e-6 * 1e-9 / PHI0_BAR;
        let g = (fp.phases[0] - PI) / beta + fp.phases[0].sin();
        assert!(g.abs() < 1e-9, "residual {}", g);
        assert!(fp.phases[0] > 0.5 && fp.phases[0] < 1.2);
    }

    #[test]
    fn test_already_at_rest() {
        let mut circuit = Circuit::new(2);
        circuit.set("C0", Capacitor::new(1e-15, NodeId::new(0), GND)).unwrap();
        circuit.set("C1", Capacitor::new(1e-15, NodeId::new(1), GND)).unwrap();
        let dynamics = Dynamics::new(&circuit).unwrap();

        let fp = solve_fixed_point(&dynamics, &[0.3, -0.2], &FixedPointCriteria::default())
            .unwrap();
        assert_eq!(fp.phases, vec![0.3, -0.2]);
        assert_eq!(fp.iterations, 0);
    }

    #[test]
    fn test_no_fixed_point() {
        // A junction cannot carry more than its critical current.
        let mut circuit = Circuit::new(1);
        circuit.set("C", Capacitor::new(1e-15, NodeId::new(0), GND)).unwrap();
        circuit.set("J", Junction::new(1e-6, NodeId::new(0), GND)).unwrap();
        circuit.set("I", CurrentBias::new(2e-6, NodeId::new(0))).unwrap();
        let dynamics = Dynamics::new(&circuit).unwrap();

        let err = solve_fixed_point(&dynamics, &[0.0], &FixedPointCriteria::default())
            .unwrap_err();
        assert_eq!(err.kind(), fluxon_core::ErrorKind::Convergence);
    }
}
