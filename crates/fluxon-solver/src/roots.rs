//! Safeguarded Newton iteration for scalar equations.

use crate::error::{Error, Result};

/// Convergence criteria for scalar root finding.
#[derive(Debug, Clone)]
pub struct RootCriteria {
    /// Relative step tolerance.
    pub xtol: f64,
    /// Maximum iterations before failure.
    pub max_iterations: usize,
    /// Largest step taken in one iteration. Keeps a phase iteration from
    /// jumping past the neighbouring extremum.
    pub max_step: f64,
}

impl Default for RootCriteria {
    fn default() -> Self {
        Self {
            xtol: 1e-13,
            max_iterations: 100,
            max_step: 3.0,
        }
    }
}

/// Find a root of `f` near `x0`, given its derivative `df`.
///
/// Fails with a model error if `f` or `df` turns non-finite or `df` vanishes,
/// and with a convergence error when the iteration budget runs out.
pub fn newton<F, D>(f: F, df: D, x0: f64, criteria: &RootCriteria) -> Result<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;
    for iteration in 0..criteria.max_iterations {
        let fx = f(x);
        if fx == 0.0 {
            return Ok(x);
        }
        let dfx = df(x);
        if !fx.is_finite() || !dfx.is_finite() {
            return Err(Error::IllConditioned {
                phase: x,
                reason: "non-finite function value".to_string(),
            });
        }
        if dfx == 0.0 {
            return Err(Error::IllConditioned {
                phase: x,
                reason: "vanishing derivative".to_string(),
            });
        }

        let step = (fx / dfx).clamp(-criteria.max_step, criteria.max_step);
        x -= step;
        log::trace!("newton iteration {}: x = {}, step = {:e}", iteration, x, step);

        if step.abs() <= criteria.xtol * (1.0 + x.abs()) {
            return Ok(x);
        }
    }

    Err(Error::ConvergenceFailed {
        method: "newton",
        iterations: criteria.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_two() {
        let criteria = RootCriteria::default();
        let root = newton(|x| x * x - 2.0, |x| 2.0 * x, 1.0, &criteria).unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_step_is_capped() {
        // Starting on the flat shoulder of atan the raw Newton step overshoots.
        let criteria = RootCriteria {
            max_step: 0.5,
            ..Default::default()
        };
        let root = newton(f64::atan, |x| 1.0 / (1.0 + x * x), 1.5, &criteria).unwrap();
        assert!(root.abs() < 1e-12);
    }

    #[test]
    fn test_flat_derivative() {
        let criteria = RootCriteria::default();
        let err = newton(|x| x * x + 1.0, |x| 2.0 * x, 0.0, &criteria).unwrap_err();
        assert_eq!(err.kind(), fluxon_core::ErrorKind::Model);
    }

    #[test]
    fn test_budget_exhausted() {
        let criteria = RootCriteria {
            max_iterations: 3,
            ..Default::default()
        };
        // No real root; iterates forever.
        let err = newton(|x| x * x + 1.0, |x| 2.0 * x, 0.3, &criteria).unwrap_err();
        assert!(matches!(err, Error::ConvergenceFailed { iterations: 3, .. }));
    }
}
