//! Fluxon command-line interface.

mod analysis;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use fluxon_core::units::parse_value;
use fluxon_solver::QubitParameters;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fluxon")]
#[command(about = "Superconducting circuit and qubit simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse the double-well potential of an rf-SQUID qubit
    Qubit(QubitArgs),
    /// Release an rf-SQUID from its left well and print the trajectory as CSV
    RingDown(RingDownArgs),
}

/// Physical parameters of a single-node rf-SQUID. Values accept SI suffixes
/// (`1u`, `1n`, `2f`, `1meg`).
#[derive(Args)]
struct QubitArgs {
    /// Junction critical current (A)
    #[arg(long = "i0", value_parser = parse_si)]
    critical_current: f64,

    /// Loop inductance (H)
    #[arg(long, value_parser = parse_si)]
    inductance: f64,

    /// Flux bias as a phase (rad)
    #[arg(long, value_parser = parse_si, default_value = "3.141592653589793", allow_hyphen_values = true)]
    bias: f64,

    /// Shunt capacitance (F)
    #[arg(long, value_parser = parse_si)]
    capacitance: f64,
}

impl QubitArgs {
    fn parameters(&self) -> QubitParameters {
        QubitParameters::new(
            self.critical_current,
            self.inductance,
            self.bias,
            self.capacitance,
        )
    }
}

#[derive(Args)]
struct RingDownArgs {
    #[command(flatten)]
    qubit: QubitArgs,

    /// Shunt resistance (Ω); lossless when omitted
    #[arg(long, value_parser = parse_si)]
    resistance: Option<f64>,

    /// End of the time grid, exclusive (s)
    #[arg(long, value_parser = parse_si)]
    stop: f64,

    /// Output time step (s)
    #[arg(long, value_parser = parse_si)]
    step: f64,

    /// Excitation in photons of the left well
    #[arg(long, default_value_t = 1.0)]
    photons: f64,
}

fn parse_si(s: &str) -> std::result::Result<f64, String> {
    parse_value(s).ok_or_else(|| format!("invalid value '{}'", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Qubit(args) => analysis::qubit::run(&args.parameters()),
        Command::RingDown(args) => {
            if args.photons < 0.0 {
                return Err(anyhow!("photon number must be non-negative"));
            }
            analysis::ring_down::run(
                &args.qubit.parameters(),
                args.resistance,
                args.stop,
                args.step,
                args.photons,
            )
        }
    }
}
