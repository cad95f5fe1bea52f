//! Potential analysis for a flux-biased rf-SQUID qubit.
//!
//! A junction shunted by an inductor and a capacitor has the potential
//!
//! ```text
//! U(δ) = E_L·(δ - bias)² - E_J·cos δ
//! ```
//!
//! with `E_L = (ħ/2e)²/2L` and `E_J = (ħ/2e)·I0`. Near `bias = π` it has two
//! wells separated by a barrier.

use std::f64::consts::PI;

use fluxon_core::{HBAR, PHI0_BAR};

use crate::error::{Error, Result};
use crate::roots::{RootCriteria, newton};

/// Junction, inductor and capacitor of a single-node qubit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QubitParameters {
    /// Junction critical current I0 (A).
    pub critical_current: f64,
    /// Loop inductance L (H).
    pub inductance: f64,
    /// Flux bias as a phase (rad); one flux quantum is 2π.
    pub bias: f64,
    /// Shunt capacitance C (F).
    pub capacitance: f64,
}

/// Stationary points of the potential, in guess order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    /// Root found from δ = 0.
    pub left: f64,
    /// Root found from δ = π.
    pub barrier: f64,
    /// Root found from δ = 2π.
    pub right: f64,
}

/// A quantity evaluated in the left and right wells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellPair {
    pub left: f64,
    pub right: f64,
}

impl WellPair {
    pub fn to_array(self) -> [f64; 2] {
        [self.left, self.right]
    }
}

impl QubitParameters {
    pub fn new(critical_current: f64, inductance: f64, bias: f64, capacitance: f64) -> Self {
        Self {
            critical_current,
            inductance,
            bias,
            capacitance,
        }
    }

    /// Reject non-finite values, L ≤ 0 and C ≤ 0.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("critical current", self.critical_current),
            ("inductance", self.inductance),
            ("bias", self.bias),
            ("capacitance", self.capacitance),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidQubitParameters(format!(
                "{} is not finite ({})",
                name, value
            )));
        }
        if self.inductance <= 0.0 {
            return Err(Error::InvalidQubitParameters(format!(
                "inductance must be positive, got {}",
                self.inductance
            )));
        }
        if self.capacitance <= 0.0 {
            return Err(Error::InvalidQubitParameters(format!(
                "capacitance must be positive, got {}",
                self.capacitance
            )));
        }
        Ok(())
    }

    /// Josephson energy E_J (J).
    pub fn josephson_energy(&self) -> f64 {
        PHI0_BAR * self.critical_current
    }

    /// Inductive energy scale E_L (J).
    pub fn inductive_energy(&self) -> f64 {
        PHI0_BAR * PHI0_BAR / self.inductance / 2.0
    }

    /// Charging energy scale E_C (J·s²).
    pub fn charging_energy(&self) -> f64 {
        PHI0_BAR * PHI0_BAR * self.capacitance / 2.0
    }

    /// Screening parameter β = E_J/2E_L = L·I0/(ħ/2e). Two wells need β > 1.
    pub fn beta(&self) -> f64 {
        self.josephson_energy() / (2.0 * self.inductive_energy())
    }

    /// U(δ) (J).
    pub fn potential(&self, delta: f64) -> f64 {
        let d = delta - self.bias;
        self.inductive_energy() * d * d - self.josephson_energy() * delta.cos()
    }

    /// dU/dδ (J/rad).
    pub fn potential_slope(&self, delta: f64) -> f64 {
        2.0 * self.inductive_energy() * (delta - self.bias) + self.josephson_energy() * delta.sin()
    }

    /// d²U/dδ² (J/rad²).
    pub fn potential_curvature(&self, delta: f64) -> f64 {
        2.0 * self.inductive_energy() + self.josephson_energy() * delta.cos()
    }

    /// Curvature at a well, which must be positive.
    fn well_curvature(&self, delta: f64) -> Result<f64> {
        let curvature = self.potential_curvature(delta);
        if curvature > 0.0 {
            Ok(curvature)
        } else {
            Err(Error::IllConditioned {
                phase: delta,
                reason: format!("curvature {:e} is not positive", curvature),
            })
        }
    }
}

/// Stationary points of the potential, from starting guesses 0, π and 2π.
///
/// The roots are reported as (left, barrier, right) in guess order. Their
/// ordering is not checked.
pub fn extrema(params: &QubitParameters, criteria: &RootCriteria) -> Result<Extrema> {
    params.validate()?;
    let find = |guess: f64| {
        newton(
            |d| params.potential_slope(d),
            |d| params.potential_curvature(d),
            guess,
            criteria,
        )
    };
    let found = Extrema {
        left: find(0.0)?,
        barrier: find(PI)?,
        right: find(2.0 * PI)?,
    };
    log::debug!(
        "qubit extrema: left {}, barrier {}, right {}",
        found.left,
        found.barrier,
        found.right
    );
    Ok(found)
}

/// Small-oscillation angular frequency `sqrt(U''/2E_C)` in each well (rad/s).
pub fn plasma_frequency(params: &QubitParameters, criteria: &RootCriteria) -> Result<WellPair> {
    let ext = extrema(params, criteria)?;
    let ec = params.charging_energy();
    let omega =
        |delta: f64| -> Result<f64> { Ok((params.well_curvature(delta)? / ec / 2.0).sqrt()) };
    Ok(WellPair {
        left: omega(ext.left)?,
        right: omega(ext.right)?,
    })
}

/// Barrier height seen from each well, `U(barrier) - U(well)` (J).
pub fn barrier_height(params: &QubitParameters, criteria: &RootCriteria) -> Result<WellPair> {
    let ext = extrema(params, criteria)?;
    let top = params.potential(ext.barrier);
    Ok(WellPair {
        left: top - params.potential(ext.left),
        right: top - params.potential(ext.right),
    })
}

/// Phase displacement holding one photon `ħω_p` in each well,
/// `sqrt(2ħω_p/U'')` (rad).
pub fn single_photon_offset(
    params: &QubitParameters,
    criteria: &RootCriteria,
) -> Result<WellPair> {
    let ext = extrema(params, criteria)?;
    let wp = plasma_frequency(params, criteria)?;
    let offset = |delta: f64, omega: f64| -> Result<f64> {
        Ok((2.0 * HBAR * omega / params.well_curvature(delta)?).sqrt())
    };
    Ok(WellPair {
        left: offset(ext.left, wp.left)?,
        right: offset(ext.right, wp.right)?,
    })
}
