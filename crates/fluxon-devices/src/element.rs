//! The closed set of circuit elements and their named parameters.

use std::fmt;
use std::str::FromStr;

use fluxon_core::NodeId;

use crate::error::{Error, Result};
use crate::junction::Junction;
use crate::mutual::Mutual;
use crate::passive::{Capacitor, Inductor, Resistor};
use crate::sources::CurrentBias;
use crate::stamp::{Observable, Stamp};

/// Anything that can be placed in a circuit.
pub trait Device: Stamp + Observable + fmt::Debug {}

impl<T: Stamp + Observable + fmt::Debug> Device for T {}

/// A circuit element.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Capacitor(Capacitor),
    Inductor(Inductor),
    Mutual(Mutual),
    Junction(Junction),
    Resistor(Resistor),
    CurrentBias(CurrentBias),
}

/// Discriminant of [`Element`], used in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Capacitor,
    Inductor,
    Mutual,
    Junction,
    Resistor,
    CurrentBias,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Capacitor => "capacitor",
            ElementKind::Inductor => "inductor",
            ElementKind::Mutual => "mutual",
            ElementKind::Junction => "junction",
            ElementKind::Resistor => "resistor",
            ElementKind::CurrentBias => "current bias",
        };
        f.write_str(name)
    }
}

/// A named element quantity.
///
/// Static parameters are fixed at construction. The time-dependent ones
/// ([`Energy`](Parameter::Energy), [`Current`](Parameter::Current),
/// [`Phase`](Parameter::Phase), [`Voltage`](Parameter::Voltage)) are only
/// available as series over a simulated trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Capacitance,
    Inductance,
    CriticalCurrent,
    Resistance,
    Bias,
    MutualInductance,
    FirstInductance,
    SecondInductance,
    CurrentBias,
    Energy,
    Current,
    Phase,
    Voltage,
}

impl Parameter {
    /// Whether the quantity varies along a trajectory.
    pub fn is_time_dependent(self) -> bool {
        matches!(
            self,
            Parameter::Energy | Parameter::Current | Parameter::Phase | Parameter::Voltage
        )
    }
}

impl FromStr for Parameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parameter = match s {
            "C" | "capacitance" => Parameter::Capacitance,
            "L" | "inductance" => Parameter::Inductance,
            "I0" | "critical_current" => Parameter::CriticalCurrent,
            "R" | "resistance" => Parameter::Resistance,
            "bias" => Parameter::Bias,
            "M" | "mutual_inductance" => Parameter::MutualInductance,
            "L1" => Parameter::FirstInductance,
            "L2" => Parameter::SecondInductance,
            "I" | "current_bias" => Parameter::CurrentBias,
            "energy" => Parameter::Energy,
            "current" => Parameter::Current,
            "phase" => Parameter::Phase,
            "voltage" => Parameter::Voltage,
            other => return Err(Error::UnknownParameter(other.to_string())),
        };
        Ok(parameter)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::Capacitance => "capacitance",
            Parameter::Inductance => "inductance",
            Parameter::CriticalCurrent => "critical_current",
            Parameter::Resistance => "resistance",
            Parameter::Bias => "bias",
            Parameter::MutualInductance => "mutual_inductance",
            Parameter::FirstInductance => "L1",
            Parameter::SecondInductance => "L2",
            Parameter::CurrentBias => "current_bias",
            Parameter::Energy => "energy",
            Parameter::Current => "current",
            Parameter::Phase => "phase",
            Parameter::Voltage => "voltage",
        };
        f.write_str(name)
    }
}

impl Element {
    /// Dispatch to the underlying device model.
    pub fn device(&self) -> &dyn Device {
        match self {
            Element::Capacitor(d) => d,
            Element::Inductor(d) => d,
            Element::Mutual(d) => d,
            Element::Junction(d) => d,
            Element::Resistor(d) => d,
            Element::CurrentBias(d) => d,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Capacitor(_) => ElementKind::Capacitor,
            Element::Inductor(_) => ElementKind::Inductor,
            Element::Mutual(_) => ElementKind::Mutual,
            Element::Junction(_) => ElementKind::Junction,
            Element::Resistor(_) => ElementKind::Resistor,
            Element::CurrentBias(_) => ElementKind::CurrentBias,
        }
    }

    /// Nodes the element touches.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.device().nodes()
    }

    /// Value of a static parameter, or `None` if this element has no such parameter.
    pub fn parameter(&self, parameter: Parameter) -> Option<f64> {
        match (self, parameter) {
            (Element::Capacitor(c), Parameter::Capacitance) => Some(c.capacitance),
            (Element::Inductor(l), Parameter::Inductance) => Some(l.inductance),
            (Element::Inductor(l), Parameter::Bias) => Some(l.bias),
            (Element::Junction(j), Parameter::CriticalCurrent) => Some(j.critical_current),
            (Element::Resistor(r), Parameter::Resistance) => Some(r.resistance),
            (Element::Mutual(m), Parameter::MutualInductance) => Some(m.mutual_inductance),
            (Element::Mutual(m), Parameter::FirstInductance) => Some(m.first_inductance),
            (Element::Mutual(m), Parameter::SecondInductance) => Some(m.second_inductance),
            (Element::CurrentBias(b), Parameter::CurrentBias) => Some(b.current),
            _ => None,
        }
    }

    /// Static parameters of the element with their values.
    fn values(&self) -> Vec<(Parameter, f64)> {
        const STATIC: [Parameter; 9] = [
            Parameter::Capacitance,
            Parameter::Inductance,
            Parameter::CriticalCurrent,
            Parameter::Resistance,
            Parameter::Bias,
            Parameter::MutualInductance,
            Parameter::FirstInductance,
            Parameter::SecondInductance,
            Parameter::CurrentBias,
        ];
        STATIC
            .into_iter()
            .filter_map(|p| self.parameter(p).map(|v| (p, v)))
            .collect()
    }

    /// Check node ranges and parameter values for insertion under `label`.
    pub fn validate(&self, label: &str, num_nodes: usize) -> Result<()> {
        let nodes = self.nodes();
        if nodes.iter().all(|n| n.is_ground()) {
            return Err(Error::GroundedTerminals {
                label: label.to_string(),
            });
        }
        for node in nodes {
            if node.check(num_nodes).is_err() {
                return Err(Error::NodeOutOfRange {
                    label: label.to_string(),
                    node: node.as_u32(),
                    num_nodes,
                });
            }
        }

        for (parameter, value) in self.values() {
            let valid = value.is_finite()
                && match parameter {
                    Parameter::Capacitance => value >= 0.0,
                    Parameter::Inductance
                    | Parameter::FirstInductance
                    | Parameter::SecondInductance
                    | Parameter::Resistance => value > 0.0,
                    _ => true,
                };
            if !valid {
                return Err(Error::InvalidValue {
                    label: label.to_string(),
                    parameter,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl From<Capacitor> for Element {
    fn from(d: Capacitor) -> Self {
        Element::Capacitor(d)
    }
}

impl From<Inductor> for Element {
    fn from(d: Inductor) -> Self {
        Element::Inductor(d)
    }
}

impl From<Mutual> for Element {
    fn from(d: Mutual) -> Self {
        Element::Mutual(d)
    }
}

impl From<Junction> for Element {
    fn from(d: Junction) -> Self {
        Element::Junction(d)
    }
}

impl From<Resistor> for Element {
    fn from(d: Resistor) -> Self {
        Element::Resistor(d)
    }
}

impl From<CurrentBias> for Element {
    fn from(d: CurrentBias) -> Self {
        Element::CurrentBias(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_aliases() {
        assert_eq!("C".parse::<Parameter>().unwrap(), Parameter::Capacitance);
        assert_eq!(
            "capacitance".parse::<Parameter>().unwrap(),
            Parameter::Capacitance
        );
        assert_eq!("I0".parse::<Parameter>().unwrap(), Parameter::CriticalCurrent);
        assert_eq!("L1".parse::<Parameter>().unwrap(), Parameter::FirstInductance);
        assert!("energy".parse::<Parameter>().unwrap().is_time_dependent());
        assert!(!"bias".parse::<Parameter>().unwrap().is_time_dependent());

        let err = "colour".parse::<Parameter>().unwrap_err();
        assert_eq!(err.kind(), fluxon_core::ErrorKind::Lookup);
    }

    #[test]
    fn test_static_parameters() {
        let el = Element::from(Inductor::new(1e-9, NodeId::new(0), NodeId::GROUND, 0.25));
        assert_eq!(el.parameter(Parameter::Inductance), Some(1e-9));
        assert_eq!(el.parameter(Parameter::Bias), Some(0.25));
        assert_eq!(el.parameter(Parameter::Capacitance), None);
        assert_eq!(el.kind(), ElementKind::Inductor);
    }

    #[test]
    fn test_validate_values() {
        let ok = Element::from(Capacitor::new(0.0, NodeId::new(0), NodeId::GROUND));
        assert!(ok.validate("C1", 1).is_ok());

        let negative = Element::from(Capacitor::new(-1e-15, NodeId::new(0), NodeId::GROUND));
        assert!(matches!(
            negative.validate("C1", 1),
            Err(Error::InvalidValue {
                parameter: Parameter::Capacitance,
                ..
            })
        ));

        let zero_l = Element::from(Inductor::new(0.0, NodeId::new(0), NodeId::GROUND, 0.0));
        assert!(zero_l.validate("L1", 1).is_err());

        let nan_r = Element::from(Resistor::new(f64::NAN, NodeId::new(0), NodeId::GROUND));
        assert!(nan_r.validate("R1", 1).is_err());

        let inf_bias = Element::from(CurrentBias::new(f64::INFINITY, NodeId::new(0)));
        assert!(inf_bias.validate("I1", 1).is_err());
    }

    #[test]
    fn test_validate_nodes() {
        let jj = Element::from(Junction::new(1e-6, NodeId::new(2), NodeId::GROUND));
        let err = jj.validate("J1", 2).unwrap_err();
        assert!(matches!(err, Error::NodeOutOfRange { node: 2, num_nodes: 2, .. }));
        assert_eq!(err.kind(), fluxon_core::ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_grounded_terminals() {
        // The raw id u32::MAX is the ground sentinel.
        let c = Element::from(Capacitor::new(1e-15, NodeId::new(u32::MAX), NodeId::GROUND));
        let err = c.validate("C1", 1).unwrap_err();
        assert!(matches!(err, Error::GroundedTerminals { .. }));
        assert_eq!(err.kind(), fluxon_core::ErrorKind::Configuration);

        let bias = Element::from(CurrentBias::new(1e-9, NodeId::GROUND));
        assert!(bias.validate("I1", 1).is_err());
    }
}
