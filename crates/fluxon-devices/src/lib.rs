//! Superconducting circuit elements and the circuit graph for fluxon.
//!
//! This crate provides:
//! - Element models: capacitor, inductor, Josephson junction, resistor,
//!   mutual inductance and current bias
//! - The [`Stamp`] trait that assembles the equations of motion
//! - The [`Observable`] trait for energy, current, phase and voltage
//! - [`Circuit`], an ordered map from labels to elements

pub mod circuit;
pub mod element;
pub mod error;
pub mod junction;
pub mod mutual;
pub mod passive;
pub mod sources;
pub mod stamp;

pub use circuit::Circuit;
pub use element::{Device, Element, ElementKind, Parameter};
pub use error::{Error, Result};
pub use junction::Junction;
pub use mutual::Mutual;
pub use passive::{Capacitor, Inductor, Resistor};
pub use sources::CurrentBias;
pub use stamp::{Observable, Stamp};
