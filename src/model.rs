//! Trained-model representation.
//!
//! Mirrors the attributes a fitted scikit-learn MLP exposes
//! (`n_features_in_`, `hidden_layer_sizes`, `coefs_`, ...). Nothing here knows
//! about ncnn; see [`crate::graph`] for the conversion.

use crate::{Error, Matrix, Result};

/// Shape, parameters and activations of a trained dense MLP.
///
/// `coefs[i]` has shape `(in_dim, out_dim)` for dense layer `i`, where
/// `in_dim` of layer 0 is `n_features_in` and each following layer consumes
/// the previous layer's `out_dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct MlpModel {
    pub n_features_in: usize,
    pub hidden_layer_sizes: Vec<usize>,
    pub n_outputs: usize,
    pub coefs: Vec<Matrix>,
    /// One entry per dense layer; `None` means the layer has no bias term.
    pub intercepts: Vec<Option<Vec<f32>>>,
    /// Activation identifier for every hidden layer.
    pub activation: String,
    /// Activation identifier for the output layer.
    pub out_activation: String,
}

/// A supported source model.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceModel {
    Classifier { mlp: MlpModel, classes: Vec<String> },
    Regressor { mlp: MlpModel },
}

impl MlpModel {
    /// Number of layers counting the input layer, like scikit-learn's `n_layers_`.
    #[inline]
    pub fn n_layers(&self) -> usize {
        self.coefs.len() + 1
    }

    /// Number of dense (weight-carrying) layers.
    #[inline]
    pub fn num_dense_layers(&self) -> usize {
        self.coefs.len()
    }

    /// Output width of dense layer `idx`.
    ///
    /// Panics if `idx >= num_dense_layers()`.
    pub fn layer_out_dim(&self, idx: usize) -> usize {
        assert!(idx < self.coefs.len(), "dense layer {idx} out of range");
        if idx + 1 == self.coefs.len() {
            self.n_outputs
        } else {
            self.hidden_layer_sizes[idx]
        }
    }

    /// Check that the matrices agree with the declared sizes.
    pub fn validate(&self) -> Result<()> {
        if self.n_features_in == 0 || self.n_outputs == 0 {
            return Err(Error::InvalidShape(format!(
                "model dims must be > 0, got n_features_in={} n_outputs={}",
                self.n_features_in, self.n_outputs
            )));
        }
        if self.hidden_layer_sizes.contains(&0) {
            return Err(Error::InvalidShape(
                "all hidden layer sizes must be > 0".to_owned(),
            ));
        }
        if self.coefs.is_empty() {
            return Err(Error::InvalidShape(
                "model must have at least one weight matrix".to_owned(),
            ));
        }
        if self.coefs.len() != self.hidden_layer_sizes.len() + 1 {
            return Err(Error::InvalidShape(format!(
                "{} weight matrices do not match {} hidden layers",
                self.coefs.len(),
                self.hidden_layer_sizes.len()
            )));
        }
        if self.intercepts.len() != self.coefs.len() {
            return Err(Error::InvalidShape(format!(
                "{} intercept entries do not match {} weight matrices",
                self.intercepts.len(),
                self.coefs.len()
            )));
        }

        let mut in_dim = self.n_features_in;
        for (i, (coef, bias)) in self.coefs.iter().zip(&self.intercepts).enumerate() {
            let out_dim = self.layer_out_dim(i);
            if coef.rows() != in_dim || coef.cols() != out_dim {
                return Err(Error::InvalidShape(format!(
                    "layer {i} weights have shape ({}, {}), expected ({in_dim}, {out_dim})",
                    coef.rows(),
                    coef.cols()
                )));
            }
            if let Some(bias) = bias
                && bias.len() != out_dim
            {
                return Err(Error::InvalidShape(format!(
                    "layer {i} bias length {} does not match out_dim {out_dim}",
                    bias.len()
                )));
            }
            in_dim = out_dim;
        }

        Ok(())
    }
}

impl SourceModel {
    #[inline]
    pub fn mlp(&self) -> &MlpModel {
        match self {
            SourceModel::Classifier { mlp, .. } | SourceModel::Regressor { mlp } => mlp,
        }
    }

    /// Class labels in the classifier's internal order.
    #[inline]
    pub fn classes(&self) -> Option<&[String]> {
        match self {
            SourceModel::Classifier { classes, .. } => Some(classes),
            SourceModel::Regressor { .. } => None,
        }
    }

    /// The scikit-learn estimator name.
    pub fn estimator_name(&self) -> &'static str {
        match self {
            SourceModel::Classifier { .. } => "MLPClassifier",
            SourceModel::Regressor { .. } => "MLPRegressor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_4_3_2() -> MlpModel {
        MlpModel {
            n_features_in: 4,
            hidden_layer_sizes: vec![3],
            n_outputs: 2,
            coefs: vec![
                Matrix::from_flat(vec![0.0; 12], 4, 3).unwrap(),
                Matrix::from_flat(vec![0.0; 6], 3, 2).unwrap(),
            ],
            intercepts: vec![Some(vec![0.0; 3]), Some(vec![0.0; 2])],
            activation: "tanh".to_owned(),
            out_activation: "identity".to_owned(),
        }
    }

    #[test]
    fn consistent_model_validates() {
        let m = model_4_3_2();
        m.validate().unwrap();
        assert_eq!(m.n_layers(), 3);
        assert_eq!(m.layer_out_dim(0), 3);
        assert_eq!(m.layer_out_dim(1), 2);
    }

    #[test]
    fn chained_shape_mismatch_is_rejected() {
        let mut m = model_4_3_2();
        m.coefs[1] = Matrix::from_flat(vec![0.0; 8], 4, 2).unwrap();
        let err = m.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
        assert!(format!("{err}").contains("layer 1"));
    }

    #[test]
    fn bias_length_and_counts_are_checked() {
        let mut m = model_4_3_2();
        m.intercepts[0] = Some(vec![0.0; 2]);
        assert!(m.validate().is_err());

        let mut m = model_4_3_2();
        m.intercepts.pop();
        assert!(m.validate().is_err());

        let mut m = model_4_3_2();
        m.hidden_layer_sizes.push(5);
        assert!(m.validate().is_err());
    }

    #[test]
    fn missing_bias_is_allowed() {
        let mut m = model_4_3_2();
        m.intercepts[1] = None;
        m.validate().unwrap();
    }
}
