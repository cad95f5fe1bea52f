//! Integration tests driving whole circuits through a `Session`.

use std::f64::consts::PI;

use fluxon_core::{ErrorKind, HBAR, PHI0_BAR};
use fluxon_solver::{Dynamics, Quantity, QubitParameters, Session};

fn series(q: Quantity) -> Vec<f64> {
    match q {
        Quantity::Series(v) => v,
        Quantity::Scalar(x) => panic!("expected a series, got scalar {}", x),
    }
}

fn max_drift(energy: &[f64]) -> f64 {
    let e0 = energy[0];
    energy.iter().map(|e| (e - e0).abs()).fold(0.0, f64::max)
}

/// Single-node rf-SQUID: C, J and a flux-biased L to ground.
fn rf_squid(bias: f64) -> Session {
    let mut session = Session::new(1);
    session.add_capacitor("C", 1e-15, 0, None).unwrap();
    session.add_junction("J", 1e-6, 0, None).unwrap();
    session.add_inductor("L", 1e-9, bias, 0, None).unwrap();
    session
}

#[test]
fn lc_oscillator_matches_cosine() {
    let mut session = Session::new(1);
    session.add_capacitor("C", 1e-12, 0, None).unwrap();
    session.add_inductor("L", 1e-9, 0.0, 0, None).unwrap();
    session.set_time_range(0.0, 1e-9, 1e-11).unwrap();
    session.set_delta(vec![0.3]).unwrap();

    session.simulate().unwrap();

    let omega = 1.0 / (1e-9f64 * 1e-12).sqrt();
    let times = session.time().unwrap().to_vec();
    let phase = series(session.get("C", "phase").unwrap());
    assert_eq!(phase.len(), times.len());
    for (t, p) in times.iter().zip(&phase) {
        let expected = 0.3 * (omega * t).cos();
        assert!((p - expected).abs() < 1e-6, "t = {:e}: {} vs {}", t, p, expected);
    }

    let current = series(session.get("L", "current").unwrap());
    assert!((current[0] - PHI0_BAR * 0.3 / 1e-9).abs() < 1e-15);
}

#[test]
fn capacitor_only_circuit_stays_at_rest() {
    let mut session = Session::new(2);
    session.add_capacitor("C0", 1e-15, 0, None).unwrap();
    session.add_capacitor("C1", 1e-15, 1, None).unwrap();
    session.set_time(vec![0.0, 1e-9, 2e-9]).unwrap();
    session.set_delta(vec![0.0, 0.0]).unwrap();
    session.set_delta_dot(vec![0.0, 0.0]).unwrap();

    session.simulate().unwrap();

    let trajectory = session.trajectory().unwrap();
    assert_eq!(trajectory.len(), 3);
    for tp in &trajectory.points {
        assert_eq!(tp.phases, vec![0.0, 0.0]);
        assert_eq!(tp.velocities, vec![0.0, 0.0]);
    }
}

#[test]
fn rf_squid_conserves_energy() {
    let mut session = rf_squid(PI);
    session.set_time_range(0.0, 5e-11, 5e-13).unwrap();
    session.set_delta(vec![0.4]).unwrap();
    session.simulate().unwrap();

    let energy = session.energy().unwrap();
    let scale = PHI0_BAR * 1e-6;
    assert!(max_drift(&energy) < 1e-6 * scale, "drift {:e}", max_drift(&energy));

    // Stored energies of the parts add up to the total.
    let parts: Vec<Vec<f64>> = ["C", "J", "L"]
        .iter()
        .map(|label| series(session.get(label, "energy").unwrap()))
        .collect();
    for (i, total) in energy.iter().enumerate() {
        let sum: f64 = parts.iter().map(|p| p[i]).sum();
        assert!((sum - total).abs() < 1e-12 * scale);
    }
}

#[test]
fn mutual_coupled_pair_conserves_energy() {
    let mut session = Session::new(2);
    session.add_capacitor("C1", 1e-12, 0, None).unwrap();
    session.add_capacitor("C2", 1e-12, 1, None).unwrap();
    session.add_inductor("L1", 1e-9, 0.0, 0, None).unwrap();
    session.add_inductor("L2", 1e-9, 0.0, 1, None).unwrap();
    session.add_mutual("M", 1e-10, "L1", "L2").unwrap();
    session.set_time_range(0.0, 2e-9, 1e-11).unwrap();
    session.set_delta(vec![0.5, 0.0]).unwrap();
    session.simulate().unwrap();

    let energy = session.energy().unwrap();
    assert!(max_drift(&energy) < 1e-6 * energy[0]);

    // Energy sloshes into the second resonator.
    let second = series(session.get("C2", "phase").unwrap());
    assert!(second.iter().any(|p| p.abs() > 0.1));

    assert_eq!(session.get("M", "M").unwrap(), Quantity::Scalar(1e-10));
    assert_eq!(session.get("M", "L2").unwrap(), Quantity::Scalar(1e-9));
    let err = session.get("M", "current").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn resistor_dissipation_is_monotone() {
    let mut session = rf_squid(PI);
    session.add_resistor("R", 1e3, 0, None).unwrap();
    session.set_time_range(0.0, 2e-11, 1e-13).unwrap();
    session.set_delta(vec![0.3]).unwrap();
    session.simulate().unwrap();

    let dissipated = series(session.get("R", "energy").unwrap());
    assert_eq!(dissipated[0], 0.0);
    assert!(dissipated.windows(2).all(|w| w[1] >= w[0]));
    assert!(*dissipated.last().unwrap() > 0.0);
}

#[test]
fn current_bias_fixed_point() {
    let mut session = Session::new(1);
    session.add_capacitor("C", 1e-15, 0, None).unwrap();
    session.add_inductor("L", 2e-9, 0.0, 0, None).unwrap();
    session.add_current_bias("I", 1e-7, 0).unwrap();
    session.set_delta(vec![0.0]).unwrap();

    let d = session.solve_initial_condition().unwrap();
    let expected = 2e-9 * 1e-7 / PHI0_BAR;
    assert!((d[0] - expected).abs() < 1e-9 * expected);
    assert_eq!(session.delta().unwrap(), d.as_slice());
}

#[test]
fn fixed_point_round_trip() {
    let mut session = rf_squid(PI);
    session.set_delta(vec![0.5]).unwrap();
    let d = session.solve_initial_condition().unwrap();

    let dynamics = Dynamics::new(session.circuit()).unwrap();
    let balance = dynamics.current_balance(&d, &[0.0]).unwrap();
    assert!(balance.net[0].abs() < 1e-6 * balance.gross[0]);

    let at_rest = dynamics.accelerations(&d, &[0.0]).unwrap().norm();
    let at_guess = dynamics.accelerations(&[0.5], &[0.0]).unwrap().norm();
    assert!(at_rest < 1e-6 * at_guess, "{:e} vs {:e}", at_rest, at_guess);

    // Solving again from a fixed point does not move it.
    let again = session.solve_initial_condition().unwrap();
    assert!((again[0] - d[0]).abs() < 1e-9);
}

#[test]
fn perturb_with_zero_is_idempotent() {
    let mut session = rf_squid(PI);
    session.set_delta(vec![0.85]).unwrap();
    let before = session.delta().unwrap().to_vec();
    let after = session.perturb_initial_condition(&[0.0]).unwrap();
    assert_eq!(before, after);

    let err = session.perturb_initial_condition(&[0.0, 0.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dimension);
}

#[test]
fn single_photon_ring_down() {
    let params = QubitParameters::new(1e-6, 1e-9, PI, 1e-15);
    let mut session = rf_squid(params.bias);
    session.set_delta(vec![0.5]).unwrap();
    session.solve_initial_condition().unwrap();

    let ext = session.qubit_extrema(&params).unwrap();
    assert!((session.delta().unwrap()[0] - ext.left).abs() < 1e-9);

    let omega = session.plasma_frequency(&params).unwrap();
    let offset = session.single_photon_offset(&params).unwrap();
    session.perturb_initial_condition(&[offset.left]).unwrap();
    session.set_time_range(0.0, 2e-11, 1e-13).unwrap();
    session.simulate().unwrap();

    let energy = session.energy().unwrap();
    let excitation = energy[0] - params.potential(ext.left);
    let photon = HBAR * omega.left;
    // The well softens towards the barrier, so the anharmonic excitation
    // falls short of one photon.
    assert!(
        excitation > 0.5 * photon && excitation < photon,
        "excitation {:e} vs photon {:e}",
        excitation,
        photon
    );
    assert!(max_drift(&energy) < 1e-6 * photon.max(energy[0].abs()));

    // The phase stays in the left well.
    let phase = series(session.get("J", "phase").unwrap());
    assert!(phase.iter().all(|p| *p < ext.barrier));
}

#[test]
fn qubit_scenario() {
    let session = Session::new(1);
    let params = QubitParameters::new(1e-6, 1e-9, PI, 1e-15);

    let ext = session.qubit_extrema(&params).unwrap();
    assert!(ext.left < ext.barrier && ext.barrier < ext.right);
    assert!((ext.left - ext.barrier).abs() > 0.1 && (ext.right - ext.barrier).abs() > 0.1);

    let barrier = session.barrier_height(&params).unwrap();
    assert!(barrier.left > 0.0 && barrier.right > 0.0);

    let wp = session.plasma_frequency(&params).unwrap();
    assert!(wp.left > 0.0 && wp.right > 0.0);

    let err = session
        .plasma_frequency(&QubitParameters::new(1e-6, -1e-9, PI, 1e-15))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Model);
}

#[test]
fn configuration_errors() {
    let mut session = rf_squid(0.0);

    let err = session.add_mutual("M", 1e-11, "L", "L9").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = session.add_mutual("M", 1e-11, "L", "J").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = session.add_capacitor("C2", 1e-15, 1, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = session.add_inductor("L2", 1e-9, 0.0, 0, Some(3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = session.set_delta(vec![0.0, 0.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dimension);
}

#[test]
fn degenerate_circuits_are_model_errors() {
    let mut session = Session::new(2);
    session.add_capacitor("C", 1e-15, 0, Some(1)).unwrap();
    session.add_junction("J", 1e-6, 0, None).unwrap();
    session.set_time(vec![0.0, 1e-12]).unwrap();
    session.set_delta(vec![0.0, 0.0]).unwrap();

    let err = session.simulate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Model);

    let mut session = Session::new(2);
    session.add_capacitor("C", 1e-15, 0, None).unwrap();
    session.set_delta(vec![0.0, 0.0]).unwrap();
    let err = session.solve_initial_condition().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Model);
}
