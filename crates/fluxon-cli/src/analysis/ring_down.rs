//! Ring-down of an rf-SQUID excited in its left well.

use std::io::{self, Write};

use anyhow::{Context, Result};
use fluxon_solver::{Quantity, QubitParameters, Session};

/// Build the rf-SQUID, settle it in the left well, displace it by the phase
/// holding `photons` photons and write `time,phase,energy` rows to stdout.
pub fn run(
    params: &QubitParameters,
    resistance: Option<f64>,
    stop: f64,
    step: f64,
    photons: f64,
) -> Result<()> {
    let mut session = Session::new(1);
    session.add_capacitor("C", params.capacitance, 0, None)?;
    session.add_junction("J", params.critical_current, 0, None)?;
    session.add_inductor("L", params.inductance, params.bias, 0, None)?;
    if let Some(r) = resistance {
        session.add_resistor("R", r, 0, None)?;
    }
    session.set_time_range(0.0, stop, step)?;

    let extrema = session.qubit_extrema(params)?;
    session.set_delta(vec![extrema.left])?;
    session
        .solve_initial_condition()
        .context("failed to settle the circuit in the left well")?;

    // Energy above the well grows with the square of the displacement.
    let offset = session.single_photon_offset(params)?.left * photons.sqrt();
    session.perturb_initial_condition(&[offset])?;

    let elapsed = session.simulate().context("ring-down simulation failed")?;
    log::info!("ring-down simulated in {:?}", elapsed);

    let times = session.time()?;
    let phase = match session.get("J", "phase")? {
        Quantity::Series(values) => values,
        Quantity::Scalar(value) => vec![value; times.len()],
    };
    let energy = session.energy()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "time,phase,energy")?;
    for ((t, p), e) in times.iter().zip(&phase).zip(&energy) {
        writeln!(out, "{:e},{:e},{:e}", t, p, e)?;
    }
    Ok(())
}
