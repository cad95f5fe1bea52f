//! Adaptive explicit Runge–Kutta integration.
//!
//! Dormand–Prince 5(4) with an embedded error estimate, first-same-as-last
//! stage reuse and standard step-size control. Steps are shortened so that
//! every requested output time is hit exactly; no interpolation is used.

use crate::error::{Error, Result};
use crate::linear::scaled_rms;

/// A first-order system `y' = f(t, y)`.
pub trait OdeSystem {
    /// Length of the state vector.
    fn dimension(&self) -> usize;

    /// Evaluate `f(t, y)` into `dy`.
    fn derivative(&self, t: f64, y: &[f64], dy: &mut [f64]) -> Result<()>;
}

/// Step-size control settings.
#[derive(Debug, Clone)]
pub struct IntegratorConfig {
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance on phases (rad). Velocities use `atol` divided by
    /// the span of the time grid.
    pub atol: f64,
    /// Maximum number of attempted steps per run.
    pub max_steps: usize,
    /// Smallest allowed step as a fraction of the time span.
    pub min_step_fraction: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-9,
            atol: 1e-9,
            max_steps: 1_000_000,
            min_step_fraction: 1e-14,
        }
    }
}

/// Step statistics of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    pub accepted: usize,
    pub rejected: usize,
    pub evaluations: usize,
}

/// States at every output time, starting with the initial state.
#[derive(Debug, Clone)]
pub struct Integration {
    pub states: Vec<Vec<f64>>,
    pub stats: IntegrationStats,
}

/// Check that `times` is a usable output grid.
pub fn validate_time_grid(times: &[f64]) -> Result<()> {
    if times.len() < 2 {
        return Err(Error::InvalidTimeGrid(format!(
            "need at least 2 points, got {}",
            times.len()
        )));
    }
    if let Some(t) = times.iter().find(|t| !t.is_finite()) {
        return Err(Error::InvalidTimeGrid(format!("non-finite time {}", t)));
    }
    if let Some(w) = times.windows(2).find(|w| w[1] <= w[0]) {
        return Err(Error::InvalidTimeGrid(format!(
            "times must be strictly increasing ({} then {})",
            w[0], w[1]
        )));
    }
    Ok(())
}

// Dormand–Prince tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// Fifth-order weights minus the embedded fourth-order ones.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

struct Stepper<'a, S: OdeSystem + ?Sized> {
    system: &'a S,
    rtol: f64,
    atol: &'a [f64],
    k: [Vec<f64>; 7],
    scratch: Vec<f64>,
    stats: IntegrationStats,
}

impl<S: OdeSystem + ?Sized> Stepper<'_, S> {
    fn eval(&mut self, t: f64, y: &[f64], stage: usize) -> Result<()> {
        self.stats.evaluations += 1;
        self.system.derivative(t, y, &mut self.k[stage])
    }

    /// Form `y + h·Σ aⱼ·kⱼ` in the scratch buffer.
    fn combine(&mut self, y: &[f64], h: f64, weights: &[(usize, f64)]) {
        for (i, out) in self.scratch.iter_mut().enumerate() {
            let incr: f64 = weights.iter().map(|&(s, a)| a * self.k[s][i]).sum();
            *out = y[i] + h * incr;
        }
    }

    fn stage(
        &mut self,
        t: f64,
        y: &[f64],
        h: f64,
        c: f64,
        weights: &[(usize, f64)],
        stage: usize,
    ) -> Result<()> {
        self.combine(y, h, weights);
        let point = std::mem::take(&mut self.scratch);
        let res = self.eval(t + c * h, &point, stage);
        self.scratch = point;
        res
    }

    /// Attempt one step of size `h` from `(t, y)`, assuming `k[0] = f(t, y)`.
    /// Leaves the fifth-order solution in `y_new` and `f(t+h, y_new)` in `k[6]`,
    /// and returns the scaled error norm.
    fn attempt(&mut self, t: f64, y: &[f64], h: f64, y_new: &mut [f64]) -> Result<f64> {
        self.stage(t, y, h, C2, &[(0, A21)], 1)?;
        self.stage(t, y, h, C3, &[(0, A31), (1, A32)], 2)?;
        self.stage(t, y, h, C4, &[(0, A41), (1, A42), (2, A43)], 3)?;
        self.stage(t, y, h, C5, &[(0, A51), (1, A52), (2, A53), (3, A54)], 4)?;
        self.stage(
            t,
            y,
            h,
            1.0,
            &[(0, A61), (1, A62), (2, A63), (3, A64), (4, A65)],
            5,
        )?;

        self.combine(y, h, &[(0, A71), (2, A73), (3, A74), (4, A75), (5, A76)]);
        y_new.copy_from_slice(&self.scratch);
        if y_new.iter().any(|v| !v.is_finite()) {
            return Ok(f64::INFINITY);
        }
        self.eval(t + h, y_new, 6)?;

        let err: Vec<f64> = (0..y.len())
            .map(|i| {
                h * (E1 * self.k[0][i]
                    + E3 * self.k[2][i]
                    + E4 * self.k[3][i]
                    + E5 * self.k[4][i]
                    + E6 * self.k[5][i]
                    + E7 * self.k[6][i])
            })
            .collect();
        Ok(scaled_rms(&err, y, y_new, self.rtol, self.atol))
    }

    /// Initial step size estimate (Hairer, Nørsett & Wanner, II.4).
    fn initial_step(&mut self, t: f64, y: &[f64], span: f64) -> Result<f64> {
        let zeros = vec![0.0; y.len()];
        let d0 = scaled_rms(y, y, &zeros, self.rtol, self.atol);
        let d1 = scaled_rms(&self.k[0], y, &zeros, self.rtol, self.atol);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6 * span
        } else {
            (0.01 * d0 / d1).min(span)
        };

        self.stage(t, y, h0, 1.0, &[(0, 1.0)], 1)?;
        let diff: Vec<f64> = self.k[1]
            .iter()
            .zip(&self.k[0])
            .map(|(a, b)| (a - b) / h0)
            .collect();
        let d2 = scaled_rms(&diff, y, &zeros, self.rtol, self.atol);

        let d = d1.max(d2);
        let h1 = if d <= 1e-15 {
            (1e-6 * span).max(h0 * 1e-3)
        } else {
            (0.01 / d).powf(1.0 / 5.0)
        };
        Ok((100.0 * h0).min(h1).min(span))
    }
}

/// Integrate `system` from `y0` at `times[0]` through every point of `times`.
///
/// `atol` gives the absolute tolerance per state component. Fails on step
/// size underflow, an exhausted step budget or a non-finite state; partial
/// results are never returned.
pub fn integrate<S: OdeSystem + ?Sized>(
    system: &S,
    times: &[f64],
    y0: &[f64],
    config: &IntegratorConfig,
    atol: &[f64],
) -> Result<Integration> {
    validate_time_grid(times)?;
    let dim = system.dimension();
    for len in [y0.len(), atol.len()] {
        if len != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: len,
            });
        }
    }

    let span = times[times.len() - 1] - times[0];
    let h_min = config.min_step_fraction * span;
    let mut stepper = Stepper {
        system,
        rtol: config.rtol,
        atol,
        k: std::array::from_fn(|_| vec![0.0; dim]),
        scratch: vec![0.0; dim],
        stats: IntegrationStats::default(),
    };

    let mut t = times[0];
    let mut y = y0.to_vec();
    let mut y_new = vec![0.0; dim];
    let mut states = Vec::with_capacity(times.len());
    states.push(y.clone());

    stepper.eval(t, &y, 0)?;
    let mut h = stepper.initial_step(t, &y, span)?;
    let mut attempts = 0usize;

    for &target in &times[1..] {
        while t < target {
            attempts += 1;
            if attempts > config.max_steps {
                return Err(Error::IntegrationFailed {
                    time: t,
                    reason: format!("step budget of {} exhausted", config.max_steps),
                });
            }

            let remaining = target - t;
            let landing = h >= remaining;
            let h_try = if landing { remaining } else { h };

            let err = stepper.attempt(t, &y, h_try, &mut y_new)?;
            // A non-finite trial state is rejected like any other bad step.
            let err = if err.is_nan() { f64::INFINITY } else { err };

            if err <= 1.0 {
                stepper.stats.accepted += 1;
                t = if landing { target } else { t + h_try };
                std::mem::swap(&mut y, &mut y_new);
                stepper.k.swap(0, 6);

                let factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                h = (h_try * factor).max(if landing { h } else { 0.0 }).min(span);
            } else {
                stepper.stats.rejected += 1;
                let factor = (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, 1.0);
                h = h_try * factor;
                log::trace!("rejected step at t = {:e}, err = {:.3}", t, err);
                if h < h_min {
                    let reason = if err.is_finite() {
                        format!("step size {:e} below minimum {:e}", h, h_min)
                    } else {
                        "state became non-finite".to_string()
                    };
                    return Err(Error::IntegrationFailed { time: t, reason });
                }
            }
        }
        states.push(y.clone());
    }

    Ok(Integration {
        states,
        stats: stepper.stats,
    })
}
