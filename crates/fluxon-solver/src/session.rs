//! A simulation session: one circuit plus its time grid, initial condition
//! and last trajectory.
//!
//! Each method corresponds to one call a remote client can make. The session
//! is exclusively owned by the caller; nothing here is shared.

use std::time::{Duration, Instant};

use fluxon_core::NodeId;
use fluxon_devices::{
    Capacitor, Circuit, CurrentBias, Element, Inductor, Junction, Parameter, Resistor,
};

use crate::dynamics::Dynamics;
use crate::equilibrium::{FixedPointCriteria, solve_fixed_point};
use crate::error::{Error, Result, check_len};
use crate::integrator::{IntegratorConfig, validate_time_grid};
use crate::observables::{element_series, total_energy};
use crate::qubit::{self, Extrema, QubitParameters, WellPair};
use crate::roots::RootCriteria;
use crate::transient::{Trajectory, simulate};

/// Largest time grid `set_time_range` will build.
const MAX_TIME_POINTS: f64 = 1e8;

/// Value returned by [`Session::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    /// A static element parameter.
    Scalar(f64),
    /// A quantity over the last simulated trajectory, one value per time point.
    Series(Vec<f64>),
}

/// One circuit and its simulation state.
#[derive(Debug, Clone)]
pub struct Session {
    circuit: Circuit,
    time: Option<Vec<f64>>,
    delta: Option<Vec<f64>>,
    delta_dot: Option<Vec<f64>>,
    trajectory: Option<Trajectory>,
    integrator: IntegratorConfig,
    fixed_point: FixedPointCriteria,
    roots: RootCriteria,
}

impl Session {
    /// Create a session with an empty circuit of `nodes` nodes.
    pub fn new(nodes: usize) -> Self {
        Self {
            circuit: Circuit::new(nodes),
            time: None,
            delta: None,
            delta_dot: None,
            trajectory: None,
            integrator: IntegratorConfig::default(),
            fixed_point: FixedPointCriteria::default(),
            roots: RootCriteria::default(),
        }
    }

    pub fn with_integrator(mut self, config: IntegratorConfig) -> Self {
        self.integrator = config;
        self
    }

    pub fn with_fixed_point_criteria(mut self, criteria: FixedPointCriteria) -> Self {
        self.fixed_point = criteria;
        self
    }

    pub fn with_root_criteria(mut self, criteria: RootCriteria) -> Self {
        self.roots = criteria;
        self
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Get the number of nodes (excluding ground).
    pub fn num_nodes(&self) -> usize {
        self.circuit.num_nodes()
    }

    /// Trajectory of the last successful run.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Insert or replace an element directly.
    ///
    /// A changed circuit no longer matches the last trajectory, so it is
    /// dropped.
    pub fn set(&mut self, label: &str, element: impl Into<Element>) -> Result<()> {
        self.circuit.set(label, element)?;
        self.trajectory = None;
        Ok(())
    }

    /// Add a capacitor between `node1` and `node2` (ground if `None`).
    pub fn add_capacitor(
        &mut self,
        label: &str,
        capacitance: f64,
        node1: u32,
        node2: Option<u32>,
    ) -> Result<()> {
        self.set(label, Capacitor::new(capacitance, NodeId::new(node1), node2.into()))
    }

    /// Add a Josephson junction between `node1` and `node2` (ground if `None`).
    pub fn add_junction(
        &mut self,
        label: &str,
        critical_current: f64,
        node1: u32,
        node2: Option<u32>,
    ) -> Result<()> {
        self.set(label, Junction::new(critical_current, NodeId::new(node1), node2.into()))
    }

    /// Add an inductor between `node1` and `node2` (ground if `None`).
    ///
    /// The bias is a phase: one flux quantum is 2π.
    pub fn add_inductor(
        &mut self,
        label: &str,
        inductance: f64,
        bias: f64,
        node1: u32,
        node2: Option<u32>,
    ) -> Result<()> {
        self.set(
            label,
            Inductor::new(inductance, NodeId::new(node1), node2.into(), bias),
        )
    }

    /// Couple two existing inductors with mutual inductance `m`.
    pub fn add_mutual(&mut self, label: &str, m: f64, first: &str, second: &str) -> Result<()> {
        let mutual = self.circuit.mutual(m, first, second)?;
        self.set(label, mutual)
    }

    /// Add a resistor between `node1` and `node2` (ground if `None`).
    pub fn add_resistor(
        &mut self,
        label: &str,
        resistance: f64,
        node1: u32,
        node2: Option<u32>,
    ) -> Result<()> {
        self.set(label, Resistor::new(resistance, NodeId::new(node1), node2.into()))
    }

    /// Add a constant current bias into `node`.
    pub fn add_current_bias(&mut self, label: &str, current: f64, node: u32) -> Result<()> {
        self.set(label, CurrentBias::new(current, NodeId::new(node)))
    }

    /// Set the output time grid (s).
    pub fn set_time(&mut self, times: Vec<f64>) -> Result<()> {
        validate_time_grid(&times)?;
        self.time = Some(times);
        Ok(())
    }

    /// Set the time grid to `start, start + step, ...` up to but excluding `stop`.
    pub fn set_time_range(&mut self, start: f64, stop: f64, step: f64) -> Result<()> {
        if !(step.is_finite() && step > 0.0 && start.is_finite() && stop.is_finite()) {
            return Err(Error::InvalidTimeGrid(format!(
                "bad range {} to {} by {}",
                start, stop, step
            )));
        }
        let count = ((stop - start) / step).ceil().max(0.0);
        if !(count <= MAX_TIME_POINTS) {
            return Err(Error::InvalidTimeGrid(format!(
                "range {} to {} by {} needs {:e} points, at most {:e} allowed",
                start, stop, step, count, MAX_TIME_POINTS
            )));
        }
        let count = count as usize;
        let times = (0..count).map(|i| start + i as f64 * step).collect();
        self.set_time(times)
    }

    pub fn time(&self) -> Result<&[f64]> {
        self.time.as_deref().ok_or(Error::MissingTimeGrid)
    }

    /// Set the initial node phases (rad).
    pub fn set_delta(&mut self, d0: Vec<f64>) -> Result<()> {
        check_len(self.num_nodes(), d0.len())?;
        self.delta = Some(d0);
        Ok(())
    }

    pub fn delta(&self) -> Result<&[f64]> {
        self.delta.as_deref().ok_or(Error::MissingInitialCondition)
    }

    /// Set the initial phase velocities (rad/s).
    pub fn set_delta_dot(&mut self, dd0: Vec<f64>) -> Result<()> {
        check_len(self.num_nodes(), dd0.len())?;
        self.delta_dot = Some(dd0);
        Ok(())
    }

    /// Initial phase velocities; zero until set.
    pub fn delta_dot(&self) -> Vec<f64> {
        self.delta_dot
            .clone()
            .unwrap_or_else(|| vec![0.0; self.num_nodes()])
    }

    /// Replace the initial phases with the nearest fixed point, using the
    /// current phases as the starting guess. Returns the new phases.
    pub fn solve_initial_condition(&mut self) -> Result<Vec<f64>> {
        let guess = self.delta()?;
        let dynamics = Dynamics::new(&self.circuit)?;
        let fixed = solve_fixed_point(&dynamics, guess, &self.fixed_point)?;
        self.delta = Some(fixed.phases.clone());
        Ok(fixed.phases)
    }

    /// Add `offset` to the initial phases elementwise. Returns the new phases.
    pub fn perturb_initial_condition(&mut self, offset: &[f64]) -> Result<Vec<f64>> {
        let n = self.num_nodes();
        check_len(n, offset.len())?;
        let d0 = self.delta.as_mut().ok_or(Error::MissingInitialCondition)?;
        for (d, o) in d0.iter_mut().zip(offset) {
            *d += o;
        }
        Ok(d0.clone())
    }

    /// Integrate over the time grid from the initial condition, replacing the
    /// previous trajectory. Returns the wall-clock time the run took.
    ///
    /// The previous trajectory is discarded even when the run fails.
    pub fn simulate(&mut self) -> Result<Duration> {
        let start = Instant::now();
        self.trajectory = None;
        let times = self.time()?;
        let d0 = self.delta()?;
        let dynamics = Dynamics::new(&self.circuit)?;
        let trajectory = simulate(
            &dynamics,
            times,
            d0,
            self.delta_dot.as_deref(),
            &self.integrator,
        )?;
        self.trajectory = Some(trajectory);
        Ok(start.elapsed())
    }

    fn last_run(&self) -> Result<(Dynamics<'_>, &Trajectory)> {
        let trajectory = self.trajectory.as_ref().ok_or(Error::NoTrajectory)?;
        Ok((Dynamics::new(&self.circuit)?, trajectory))
    }

    /// Look up `parameter` (short or long name) of the element `label`.
    ///
    /// Static parameters come back as scalars; energy, current, phase and
    /// voltage as series over the last run.
    pub fn get(&self, label: &str, parameter: &str) -> Result<Quantity> {
        let element = self.circuit.get(label)?;
        let parameter: Parameter = parameter.parse()?;

        if !parameter.is_time_dependent() {
            let value = element.parameter(parameter).ok_or_else(|| {
                fluxon_devices::Error::ParameterUnavailable {
                    label: label.to_string(),
                    kind: element.kind(),
                    parameter,
                }
            })?;
            return Ok(Quantity::Scalar(value));
        }

        let (dynamics, trajectory) = self.last_run()?;
        Ok(Quantity::Series(element_series(
            &dynamics, trajectory, label, parameter,
        )?))
    }

    /// Total energy over the last run, including energy dissipated so far (J).
    pub fn energy(&self) -> Result<Vec<f64>> {
        let (dynamics, trajectory) = self.last_run()?;
        total_energy(&dynamics, trajectory)
    }

    pub fn qubit_extrema(&self, params: &QubitParameters) -> Result<Extrema> {
        qubit::extrema(params, &self.roots)
    }

    pub fn plasma_frequency(&self, params: &QubitParameters) -> Result<WellPair> {
        qubit::plasma_frequency(params, &self.roots)
    }

    pub fn barrier_height(&self, params: &QubitParameters) -> Result<WellPair> {
        qubit::barrier_height(params, &self.roots)
    }

    pub fn single_photon_offset(&self, params: &QubitParameters) -> Result<WellPair> {
        qubit::single_photon_offset(params, &self.roots)
    }
}
