//! Circuit graph representation.

use indexmap::IndexMap;
use indexmap::map::Iter;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::mutual::Mutual;
use crate::passive::Inductor;

/// A circuit: a fixed set of nodes plus labelled elements.
///
/// Elements are kept in insertion order; replacing a label keeps its
/// original position.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    num_nodes: usize,
    elements: IndexMap<String, Element>,
}

impl Circuit {
    /// Create an empty circuit with `num_nodes` dynamical nodes (ground excluded).
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            elements: IndexMap::new(),
        }
    }

    /// Get the number of nodes (excluding ground).
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Insert or replace the element under `label`.
    ///
    /// Fails without modifying the circuit if a node is out of range, a value
    /// is invalid, a mutual's references do not resolve to inductors, or an
    /// inductor some mutual couples would be replaced by another kind.
    pub fn set(&mut self, label: impl Into<String>, element: impl Into<Element>) -> Result<()> {
        let label = label.into();
        let element = element.into();
        element.validate(&label, self.num_nodes)?;

        if let Element::Mutual(mutual) = &element {
            if mutual.references(&label) {
                return Err(Error::SelfReference { label });
            }
            self.inductor(&mutual.first)?;
            self.inductor(&mutual.second)?;
        }

        if !matches!(element, Element::Inductor(_)) {
            if let Some(referenced_by) = self.referencing_mutual(&label) {
                return Err(Error::IncompatibleReplacement {
                    label,
                    referenced_by: referenced_by.to_string(),
                });
            }
        }

        self.elements.insert(label, element);
        Ok(())
    }

    /// Get the element under `label`.
    pub fn get(&self, label: &str) -> Result<&Element> {
        self.elements
            .get(label)
            .ok_or_else(|| Error::ElementNotFound(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.elements.contains_key(label)
    }

    /// Iterate over `(label, element)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, String, Element> {
        self.elements.iter()
    }

    /// Iterate over the elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Resolve `label` to an inductor.
    ///
    /// Unknown labels and other element kinds are configuration errors, since
    /// the caller is wiring up a coupling rather than looking up a value.
    pub fn inductor(&self, label: &str) -> Result<&Inductor> {
        match self.elements.get(label) {
            Some(Element::Inductor(inductor)) => Ok(inductor),
            Some(other) => Err(Error::NotAnInductor {
                label: label.to_string(),
                kind: other.kind(),
            }),
            None => Err(Error::UnresolvedReference(label.to_string())),
        }
    }

    /// Build a mutual inductance coupling two existing inductors.
    ///
    /// The mutual copies the inductors' terminals and inductances as they are now.
    pub fn mutual(&self, mutual_inductance: f64, first: &str, second: &str) -> Result<Mutual> {
        let first_inductor = self.inductor(first)?;
        let second_inductor = self.inductor(second)?;
        Ok(Mutual::between(
            mutual_inductance,
            first,
            first_inductor,
            second,
            second_inductor,
        ))
    }

    fn referencing_mutual(&self, label: &str) -> Option<&str> {
        self.elements.iter().find_map(|(name, element)| match element {
            Element::Mutual(m) if m.references(label) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = (&'a String, &'a Element);
    type IntoIter = Iter<'a, String, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use fluxon_core::{ErrorKind, NodeId};

    use super::*;
    use crate::junction::Junction;
    use crate::passive::Capacitor;

    fn n(i: u32) -> NodeId {
        NodeId::new(i)
    }

    fn coupled() -> Circuit {
        let mut circuit = Circuit::new(2);
        circuit
            .set("L1", Inductor::new(1e-9, n(0), NodeId::GROUND, 0.0))
            .unwrap();
        circuit
            .set("L2", Inductor::new(2e-9, n(1), NodeId::GROUND, 0.0))
            .unwrap();
        let m = circuit.mutual(1e-10, "L1", "L2").unwrap();
        circuit.set("M", m).unwrap();
        circuit
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut circuit = Circuit::new(1);
        circuit.set("C", Capacitor::new(1e-15, n(0), NodeId::GROUND)).unwrap();
        circuit.set("J", Junction::new(1e-6, n(0), NodeId::GROUND)).unwrap();
        circuit.set("C", Capacitor::new(2e-15, n(0), NodeId::GROUND)).unwrap();

        let labels: Vec<_> = circuit.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["C", "J"]);
        assert_eq!(circuit.len(), 2);
        assert_eq!(
            circuit.get("C").unwrap().parameter(crate::Parameter::Capacitance),
            Some(2e-15)
        );
    }

    #[test]
    fn test_get_missing_is_lookup_error() {
        let circuit = Circuit::new(1);
        let err = circuit.get("X").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_invalid_node_rejected() {
        let mut circuit = Circuit::new(1);
        let err = circuit
            .set("C", Capacitor::new(1e-15, n(1), NodeId::GROUND))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_mutual_snapshot() {
        let mut circuit = coupled();
        circuit
            .set("L1", Inductor::new(5e-9, n(1), NodeId::GROUND, 1.0))
            .unwrap();

        let Element::Mutual(m) = circuit.get("M").unwrap() else {
            panic!("expected a mutual");
        };
        assert_eq!(m.first_inductance, 1e-9);
        assert_eq!(m.first_nodes, (n(0), NodeId::GROUND));
    }

    #[test]
    fn test_mutual_reference_errors() {
        let mut circuit = coupled();
        circuit.set("J", Junction::new(1e-6, n(0), NodeId::GROUND)).unwrap();

        let err = circuit.mutual(1e-10, "L1", "nope").unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(ref l) if l == "nope"));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = circuit.mutual(1e-10, "L1", "J").unwrap_err();
        assert!(matches!(err, Error::NotAnInductor { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_incompatible_replacement() {
        let mut circuit = coupled();
        let err = circuit
            .set("L2", Capacitor::new(1e-15, n(1), NodeId::GROUND))
            .unwrap_err();
        assert!(matches!(err, Error::IncompatibleReplacement { .. }));
        assert!(matches!(circuit.get("L2").unwrap(), Element::Inductor(_)));

        let m = circuit.mutual(1e-10, "L1", "L2").unwrap();
        let err = circuit.set("L1", m).unwrap_err();
        assert!(matches!(err, Error::SelfReference { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
