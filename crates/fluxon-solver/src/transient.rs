//! Transient analysis: phase trajectories over a time grid.

use std::time::Instant;

use crate::dynamics::Dynamics;
use crate::error::{Result, check_len};
use crate::integrator::{IntegrationStats, IntegratorConfig, integrate, validate_time_grid};

/// A single timepoint in a transient simulation result.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    /// Time value (s).
    pub time: f64,
    /// Node phases (rad).
    pub phases: Vec<f64>,
    /// Node phase velocities (rad/s).
    pub velocities: Vec<f64>,
}

/// Result of a transient simulation.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// One point per requested output time, in order.
    pub points: Vec<TimePoint>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
    /// Integrator step statistics.
    pub stats: IntegrationStats,
}

impl Trajectory {
    /// Get all time values.
    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|tp| tp.time).collect()
    }

    /// Get the phase of a node across all timepoints.
    pub fn phase_waveform(&self, node_idx: usize) -> Vec<f64> {
        self.points.iter().map(|tp| tp.phases[node_idx]).collect()
    }

    /// Get the phase velocity of a node across all timepoints.
    pub fn velocity_waveform(&self, node_idx: usize) -> Vec<f64> {
        self.points.iter().map(|tp| tp.velocities[node_idx]).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Run a transient simulation.
///
/// # Arguments
/// * `dynamics` - Compiled equations of motion
/// * `times` - Output times, strictly increasing, at least two points
/// * `d0` - Initial node phases
/// * `dd0` - Initial phase velocities (zero if `None`)
/// * `config` - Step-size control settings
pub fn simulate(
    dynamics: &Dynamics<'_>,
    times: &[f64],
    d0: &[f64],
    dd0: Option<&[f64]>,
    config: &IntegratorConfig,
) -> Result<Trajectory> {
    let n = dynamics.num_nodes();
    validate_time_grid(times)?;
    check_len(n, d0.len())?;
    if let Some(dd0) = dd0 {
        check_len(n, dd0.len())?;
    }

    let mut y0 = Vec::with_capacity(2 * n);
    y0.extend_from_slice(d0);
    match dd0 {
        Some(dd0) => y0.extend_from_slice(dd0),
        None => y0.resize(2 * n, 0.0),
    }

    let span = times[times.len() - 1] - times[0];
    let mut atol = vec![config.atol; n];
    atol.resize(2 * n, config.atol / span);

    let start = Instant::now();
    let integration = integrate(dynamics, times, &y0, config, &atol)?;
    log::info!(
        "transient: {} output points, {} steps accepted, {} rejected, {} evaluations in {:?}",
        times.len(),
        integration.stats.accepted,
        integration.stats.rejected,
        integration.stats.evaluations,
        start.elapsed()
    );

    let points = times
        .iter()
        .zip(integration.states)
        .map(|(&time, mut state)| {
            let velocities = state.split_off(n);
            TimePoint {
                time,
                phases: state,
                velocities,
            }
        })
        .collect();

    Ok(Trajectory {
        points,
        num_nodes: n,
        stats: integration.stats,
    })
}
