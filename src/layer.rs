//! ncnn layer descriptors.
//!
//! Every layer shares a [`LayerHeader`] (name and blob wiring) and carries a
//! [`LayerParams`] payload specific to its type.

use crate::{ActivationNode, Matrix};

/// Name and blob wiring common to every layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerHeader {
    pub name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Dense layer payload.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerProduct {
    pub output_width: usize,
    /// Shape `(in_dim, output_width)`, as stored in the source model.
    pub weights: Matrix,
    pub bias: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerParams {
    Input { feature_count: usize },
    InnerProduct(InnerProduct),
    Activation(ActivationNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub header: LayerHeader,
    pub params: LayerParams,
}

impl InnerProduct {
    #[inline]
    pub fn has_bias(&self) -> bool {
        self.bias.is_some()
    }

    /// Number of weight elements (`weight_data_size` in ncnn terms).
    #[inline]
    pub fn weight_data_size(&self) -> usize {
        self.weights.len()
    }
}

impl Layer {
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<String>,
        outputs: Vec<String>,
        params: LayerParams,
    ) -> Self {
        Self {
            header: LayerHeader {
                name: name.into(),
                inputs,
                outputs,
            },
            params,
        }
    }

    /// Layer type token as written to the `.param` file.
    pub fn type_name(&self) -> &'static str {
        match &self.params {
            LayerParams::Input { .. } => "Input",
            LayerParams::InnerProduct(_) => "InnerProduct",
            LayerParams::Activation(node) => node.type_name(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    #[inline]
    pub fn inputs(&self) -> &[String] {
        &self.header.inputs
    }

    #[inline]
    pub fn outputs(&self) -> &[String] {
        &self.header.outputs
    }

    #[inline]
    pub fn as_inner_product(&self) -> Option<&InnerProduct> {
        match &self.params {
            LayerParams::InnerProduct(ip) => Some(ip),
            _ => None,
        }
    }
}
