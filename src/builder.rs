//! Graph builder.
//!
//! `GraphBuilder` assembles the linear ncnn layer chain one node at a time and
//! takes care of naming and blob wiring:
//!
//! - the input layer is `input`, producing `input_blob`;
//! - dense layer `i` is `layer_{i}`, producing `layer_{i}_blob`;
//! - an activation after dense layer `i` is `layer_{i}_{type}`, producing
//!   `layer_{i}_{type}_blob` (lowercased).
//!
//! Each layer consumes the previous layer's output blob, so the chain is fully
//! determined by the order of calls.

use tracing::debug;

use crate::{Activation, Error, Graph, InnerProduct, Layer, LayerParams, Matrix, MlpModel, Result};

#[derive(Debug, Clone)]
/// Builder for a [`Graph`].
///
/// Example:
///
/// ```rust
/// use mlp2ncnn::{Activation, GraphBuilder, Matrix};
///
/// # fn main() -> mlp2ncnn::Result<()> {
/// let graph = GraphBuilder::new(2)?
///     .inner_product(Matrix::from_flat(vec![0.5; 6], 2, 3)?, Some(vec![0.0; 3]))?
///     .activation(Activation::ReLU)?
///     .inner_product(Matrix::from_flat(vec![0.5; 3], 3, 1)?, None)?
///     .activation(Activation::Identity)?
///     .build();
/// assert_eq!(graph.len(), 4);
/// # Ok(())
/// # }
/// ```
pub struct GraphBuilder {
    layers: Vec<Layer>,
    width: usize,
    dense_count: usize,
}

impl GraphBuilder {
    /// Start a graph whose input vector has `feature_count` elements.
    pub fn new(feature_count: usize) -> Result<Self> {
        if feature_count == 0 {
            return Err(Error::InvalidShape("feature_count must be > 0".to_owned()));
        }

        let input = Layer::new(
            "input",
            Vec::new(),
            vec!["input_blob".to_owned()],
            LayerParams::Input { feature_count },
        );
        debug!(feature_count, "emit Input layer");

        Ok(Self {
            layers: vec![input],
            width: feature_count,
            dense_count: 0,
        })
    }

    fn last(&self) -> &Layer {
        // `new` always pushes the input layer.
        &self.layers[self.layers.len() - 1]
    }

    /// Append a dense layer.
    ///
    /// `weights` has shape `(in_dim, out_dim)` where `in_dim` is the width of the
    /// current chain end. `bias`, when given, must have `out_dim` elements.
    pub fn inner_product(mut self, weights: Matrix, bias: Option<Vec<f32>>) -> Result<Self> {
        let idx = self.dense_count;
        if weights.rows() != self.width {
            return Err(Error::InvalidShape(format!(
                "layer {idx} weights have {} rows, expected {}",
                weights.rows(),
                self.width
            )));
        }
        let output_width = weights.cols();
        if let Some(b) = &bias
            && b.len() != output_width
        {
            return Err(Error::InvalidShape(format!(
                "layer {idx} bias length {} does not match out_dim {output_width}",
                b.len()
            )));
        }

        let name = format!("layer_{idx}");
        let outputs = vec![format!("{name}_blob")];
        let inputs = self.last().outputs().to_vec();
        debug!(
            layer = %name,
            output_width,
            has_bias = bias.is_some(),
            "emit InnerProduct layer"
        );

        self.layers.push(Layer::new(
            name,
            inputs,
            outputs,
            LayerParams::InnerProduct(InnerProduct {
                output_width,
                weights,
                bias,
            }),
        ));
        self.width = output_width;
        self.dense_count += 1;
        Ok(self)
    }

    /// Append the activation applied to the preceding dense layer.
    ///
    /// `Activation::Identity` emits nothing. Any other activation must directly
    /// follow an `InnerProduct` layer.
    pub fn activation(mut self, activation: Activation) -> Result<Self> {
        let Some(node) = activation.node() else {
            return Ok(self);
        };

        let prev = self.last();
        if prev.as_inner_product().is_none() {
            return Err(Error::InvalidShape(format!(
                "{activation} activation must follow an InnerProduct layer, not {}",
                prev.type_name()
            )));
        }

        let name = format!("{}_{}", prev.name(), node.type_name()).to_lowercase();
        let outputs = vec![format!("{name}_blob")];
        let inputs = prev.outputs().to_vec();
        debug!(layer = %name, "emit {} layer", node.type_name());

        self.layers.push(Layer::new(
            name,
            inputs,
            outputs,
            LayerParams::Activation(node),
        ));
        Ok(self)
    }

    pub fn build(self) -> Graph {
        Graph::from_layers(self.layers)
    }
}

impl Graph {
    /// Build the ncnn layer graph for a trained MLP.
    ///
    /// Hidden dense layers get `mlp.activation`; the last dense layer gets
    /// `mlp.out_activation`.
    pub fn from_model(mlp: &MlpModel) -> Result<Graph> {
        mlp.validate()?;

        let n = mlp.num_dense_layers();
        let mut builder = GraphBuilder::new(mlp.n_features_in)?;
        for (i, (coef, bias)) in mlp.coefs.iter().zip(&mlp.intercepts).enumerate() {
            let act_id = if i + 1 < n {
                &mlp.activation
            } else {
                &mlp.out_activation
            };
            let activation: Activation = act_id.parse()?;
            builder = builder
                .inner_product(coef.clone(), bias.clone())?
                .activation(activation)?;
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mlp(hidden: &[usize], activation: &str, out_activation: &str) -> MlpModel {
        let n_features_in = 4;
        let n_outputs = 2;
        let mut dims = vec![n_features_in];
        dims.extend_from_slice(hidden);
        dims.push(n_outputs);

        let coefs = dims
            .windows(2)
            .map(|w| Matrix::from_flat(vec![0.25; w[0] * w[1]], w[0], w[1]).unwrap())
            .collect::<Vec<_>>();
        let intercepts = dims[1..].iter().map(|&d| Some(vec![0.5; d])).collect();

        MlpModel {
            n_features_in,
            hidden_layer_sizes: hidden.to_vec(),
            n_outputs,
            coefs,
            intercepts,
            activation: activation.to_owned(),
            out_activation: out_activation.to_owned(),
        }
    }

    fn type_names(g: &Graph) -> Vec<&'static str> {
        g.layers().iter().map(|l| l.type_name()).collect()
    }

    #[test]
    fn regressor_with_identity_output_has_no_trailing_activation() {
        let g = Graph::from_model(&mlp(&[3], "tanh", "identity")).unwrap();
        assert_eq!(type_names(&g), ["Input", "InnerProduct", "TanH", "InnerProduct"]);

        match &g.layers()[0].params {
            LayerParams::Input { feature_count } => assert_eq!(*feature_count, 4),
            other => panic!("expected Input, got {other:?}"),
        }
        assert_eq!(g.layers()[1].as_inner_product().unwrap().output_width, 3);
        assert_eq!(g.layers()[3].as_inner_product().unwrap().output_width, 2);
    }

    #[test]
    fn classifier_ends_with_softmax() {
        let g = Graph::from_model(&mlp(&[3], "tanh", "softmax")).unwrap();
        assert_eq!(g.len(), 5);
        assert_eq!(g.layers()[4].type_name(), "Softmax");
    }

    #[test]
    fn names_and_blobs_form_a_chain() {
        let g = Graph::from_model(&mlp(&[5, 3], "logistic", "softmax")).unwrap();
        let names: Vec<&str> = g.layers().iter().map(|l| l.name()).collect();
        assert_eq!(
            names,
            [
                "input",
                "layer_0",
                "layer_0_sigmoid",
                "layer_1",
                "layer_1_sigmoid",
                "layer_2",
                "layer_2_softmax",
            ]
        );

        for pair in g.layers().windows(2) {
            assert_eq!(pair[1].inputs(), pair[0].outputs());
        }
        assert!(g.layers()[0].inputs().is_empty());
        assert_eq!(g.layers()[2].outputs(), ["layer_0_sigmoid_blob"]);
    }

    #[test]
    fn identity_hidden_layers_chain_dense_layers_directly() {
        let g = Graph::from_model(&mlp(&[3, 3], "identity", "relu")).unwrap();
        assert_eq!(
            type_names(&g),
            ["Input", "InnerProduct", "InnerProduct", "InnerProduct", "ReLU"]
        );
        assert_eq!(g.layers()[2].inputs(), ["layer_0_blob"]);
        assert_eq!(g.inner_products().count(), 3);
    }

    #[test]
    fn single_dense_layer_uses_output_activation() {
        let g = Graph::from_model(&mlp(&[], "relu", "logistic")).unwrap();
        assert_eq!(type_names(&g), ["Input", "InnerProduct", "Sigmoid"]);
    }

    #[test]
    fn unsupported_activation_aborts_construction() {
        let err = Graph::from_model(&mlp(&[3], "swish", "identity")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedActivation(_)));

        let err = Graph::from_model(&mlp(&[3], "tanh", "elu")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedActivation(_)));
    }

    #[test]
    fn activation_must_follow_dense_layer() {
        let err = GraphBuilder::new(2)
            .unwrap()
            .activation(Activation::Tanh)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));

        // Identity is a no-op anywhere.
        let g = GraphBuilder::new(2)
            .unwrap()
            .activation(Activation::Identity)
            .unwrap()
            .build();
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn dense_layer_width_must_match_chain() {
        let err = GraphBuilder::new(3)
            .unwrap()
            .inner_product(Matrix::from_flat(vec![0.0; 4], 2, 2).unwrap(), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }
}
