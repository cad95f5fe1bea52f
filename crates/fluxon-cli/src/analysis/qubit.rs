//! Double-well analysis of an rf-SQUID.

use anyhow::{Context, Result};
use fluxon_core::units::{format_energy, format_value};
use fluxon_solver::{QubitParameters, Session};

/// Print the extrema of the potential and the small-oscillation properties of
/// both wells.
pub fn run(params: &QubitParameters) -> Result<()> {
    let session = Session::new(1);

    let extrema = session
        .qubit_extrema(params)
        .context("failed to locate the extrema of the potential")?;
    let omega = session.plasma_frequency(params)?;
    let barrier = session.barrier_height(params)?;
    let offset = session.single_photon_offset(params)?;

    println!("rf-SQUID Potential Analysis");
    println!("===========================");
    println!();
    println!("  beta = {:.4}", params.beta());
    println!();
    println!("{:>22}{:>14}{:>14}", "", "left", "right");
    println!("{}", "-".repeat(50));
    println!(
        "{:>22}{:>14.6}{:>14.6}",
        "well phase (rad)", extrema.left, extrema.right
    );
    println!(
        "{:>22}{:>14}{:>14}",
        "plasma freq (rad/s)",
        format_value(omega.left),
        format_value(omega.right)
    );
    println!(
        "{:>22}{:>14.6}{:>14.6}",
        "photon offset (rad)", offset.left, offset.right
    );
    println!();
    println!("  barrier top at {:.6} rad", extrema.barrier);
    println!("  barrier height from left:  {}", format_energy(barrier.left));
    println!("  barrier height from right: {}", format_energy(barrier.right));

    if !(extrema.left < extrema.barrier && extrema.barrier < extrema.right) {
        log::warn!(
            "extrema are not ordered left < barrier < right; the potential may have a single well"
        );
    }
    Ok(())
}
