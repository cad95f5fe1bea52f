//! Analyses run from the command line.

pub mod qubit;
pub mod ring_down;
