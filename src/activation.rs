//! Activation functions.
//!
//! A trained MLP names its activations with scikit-learn identifiers
//! (`identity`, `tanh`, `logistic`, `relu`, `softmax`). ncnn has no identity
//! layer, so a dense layer followed by `identity` is emitted on its own; every
//! other identifier becomes exactly one activation layer after the dense layer.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Activation identifier as stored in the source model.
pub enum Activation {
    Identity,
    Tanh,
    Logistic,
    ReLU,
    Softmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// ncnn activation layer type.
pub enum ActivationNode {
    TanH,
    Sigmoid,
    ReLU,
    Softmax,
}

impl Activation {
    /// The scikit-learn identifier for this activation.
    pub fn as_str(self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Tanh => "tanh",
            Activation::Logistic => "logistic",
            Activation::ReLU => "relu",
            Activation::Softmax => "softmax",
        }
    }

    /// The ncnn layer that implements this activation, or `None` for identity.
    #[inline]
    pub fn node(self) -> Option<ActivationNode> {
        match self {
            Activation::Identity => None,
            Activation::Tanh => Some(ActivationNode::TanH),
            Activation::Logistic => Some(ActivationNode::Sigmoid),
            Activation::ReLU => Some(ActivationNode::ReLU),
            Activation::Softmax => Some(ActivationNode::Softmax),
        }
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity" => Ok(Activation::Identity),
            "tanh" => Ok(Activation::Tanh),
            "logistic" => Ok(Activation::Logistic),
            "relu" => Ok(Activation::ReLU),
            "softmax" => Ok(Activation::Softmax),
            other => Err(Error::UnsupportedActivation(format!(
                "'{other}' (expected one of identity, tanh, logistic, relu, softmax)"
            ))),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActivationNode {
    /// Layer type token written to the `.param` file.
    #[inline]
    pub fn type_name(self) -> &'static str {
        match self {
            ActivationNode::TanH => "TanH",
            ActivationNode::Sigmoid => "Sigmoid",
            ActivationNode::ReLU => "ReLU",
            ActivationNode::Softmax => "Softmax",
        }
    }
}

/// Map an activation identifier straight to its ncnn layer type.
pub fn map_activation(id: &str) -> Result<Option<ActivationNode>> {
    Ok(id.parse::<Activation>()?.node())
}
