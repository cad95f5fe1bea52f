//! Element quantities evaluated along a trajectory.

use fluxon_core::PhaseState;
use fluxon_devices::{Element, Parameter};

use crate::dynamics::Dynamics;
use crate::error::{Error, Result};
use crate::transient::Trajectory;

/// Series of a time-dependent quantity of the element `label`, one value per
/// trajectory point.
///
/// A resistor's energy is the energy it has dissipated since the first point
/// (trapezoidal rule), so that it balances the stored energy lost.
pub fn element_series(
    dynamics: &Dynamics<'_>,
    trajectory: &Trajectory,
    label: &str,
    parameter: Parameter,
) -> Result<Vec<f64>> {
    check_trajectory(dynamics, trajectory)?;
    let element = dynamics.circuit().get(label)?;
    if matches!((element, parameter), (Element::Resistor(_), Parameter::Energy)) {
        return dissipated_energy(element, trajectory);
    }

    let needs_accelerations =
        matches!((element, parameter), (Element::Capacitor(_), Parameter::Current));

    let mut series = Vec::with_capacity(trajectory.len());
    for tp in &trajectory.points {
        let state = PhaseState::new(&tp.phases, &tp.velocities)?;
        let device = element.device();
        let value = if needs_accelerations {
            let acc = dynamics.accelerations(&tp.phases, &tp.velocities)?;
            let state = state.with_accelerations(acc.as_slice())?;
            device.current(&state)
        } else {
            match parameter {
                Parameter::Energy => Some(device.energy(&state)),
                Parameter::Current => device.current(&state),
                Parameter::Phase => device.phase(&state),
                Parameter::Voltage => device.voltage(&state),
                _ => None,
            }
        };
        let value = value.ok_or_else(|| fluxon_devices::Error::ParameterUnavailable {
            label: label.to_string(),
            kind: element.kind(),
            parameter,
        })?;
        series.push(value);
    }
    Ok(series)
}

fn dissipated_energy(element: &Element, trajectory: &Trajectory) -> Result<Vec<f64>> {
    let device = element.device();
    let mut series = Vec::with_capacity(trajectory.len());
    let mut total = 0.0;
    let mut previous: Option<(f64, f64)> = None;
    for tp in &trajectory.points {
        let state = PhaseState::new(&tp.phases, &tp.velocities)?;
        let power = device.power(&state);
        if let Some((t, p)) = previous {
            total += 0.5 * (power + p) * (tp.time - t);
        }
        previous = Some((tp.time, power));
        series.push(total);
    }
    Ok(series)
}

/// Total energy at every trajectory point: energy stored in all elements
/// plus the energy dissipated in resistors so far.
pub fn total_energy(dynamics: &Dynamics<'_>, trajectory: &Trajectory) -> Result<Vec<f64>> {
    check_trajectory(dynamics, trajectory)?;
    let mut total = trajectory
        .points
        .iter()
        .map(|tp| dynamics.stored_energy(&tp.phases, &tp.velocities))
        .collect::<Result<Vec<f64>>>()?;

    for element in dynamics.circuit().elements() {
        if let Element::Resistor(_) = element {
            for (sum, e) in total.iter_mut().zip(dissipated_energy(element, trajectory)?) {
                *sum += e;
            }
        }
    }
    Ok(total)
}

/// Check that a trajectory belongs to the circuit of `dynamics`.
fn check_trajectory(dynamics: &Dynamics<'_>, trajectory: &Trajectory) -> Result<()> {
    if trajectory.num_nodes == dynamics.num_nodes() {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected: dynamics.num_nodes(),
            actual: trajectory.num_nodes,
        })
    }
}
