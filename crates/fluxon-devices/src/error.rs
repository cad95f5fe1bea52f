//! Error types for fluxon-devices.

use fluxon_core::ErrorKind;
use thiserror::Error;

use crate::element::{ElementKind, Parameter};

#[derive(Debug, Error)]
pub enum Error {
    #[error("element {label}: node {node} is out of range for a circuit with {num_nodes} nodes")]
    NodeOutOfRange {
        label: String,
        node: u32,
        num_nodes: usize,
    },

    #[error("element {label} has invalid {parameter}: {value}")]
    InvalidValue {
        label: String,
        parameter: Parameter,
        value: f64,
    },

    #[error("element {label} has every terminal on ground")]
    GroundedTerminals { label: String },

    #[error("no inductor labelled {0} to couple")]
    UnresolvedReference(String),

    #[error("element {label} is a {kind}, not an inductor")]
    NotAnInductor { label: String, kind: ElementKind },

    #[error("label {label} is referenced by mutual {referenced_by} and must stay an inductor")]
    IncompatibleReplacement { label: String, referenced_by: String },

    #[error("mutual {label} cannot reference itself")]
    SelfReference { label: String },

    #[error("no element labelled {0}")]
    ElementNotFound(String),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("{kind} {label} has no {parameter}")]
    ParameterUnavailable {
        label: String,
        kind: ElementKind,
        parameter: Parameter,
    },
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NodeOutOfRange { .. }
            | Error::InvalidValue { .. }
            | Error::GroundedTerminals { .. }
            | Error::UnresolvedReference(_)
            | Error::NotAnInductor { .. }
            | Error::IncompatibleReplacement { .. }
            | Error::SelfReference { .. } => ErrorKind::Configuration,
            Error::ElementNotFound(_)
            | Error::UnknownParameter(_)
            | Error::ParameterUnavailable { .. } => ErrorKind::Lookup,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
