//! Trained-model loading (feature: `serde`).
//!
//! Models arrive as a versioned JSON export of a fitted scikit-learn
//! `MLPClassifier` / `MLPRegressor`:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "estimator": "MLPRegressor",
//!   "n_features_in": 4,
//!   "hidden_layer_sizes": [3],
//!   "n_outputs": 2,
//!   "activation": "tanh",
//!   "out_activation": "identity",
//!   "coefs": [[[...], ...], ...],
//!   "intercepts": [[...], null]
//! }
//! ```
//!
//! `coefs[i]` is the `(in_dim, out_dim)` matrix of dense layer `i`, as nested
//! rows. A `null` intercept means the layer has no bias. Classifiers also carry
//! `"classes"`, whose entries may be strings, integers, floats or booleans.
//!
//! Design notes:
//! - The estimator name is checked before the rest of the document is parsed,
//!   so a foreign model is reported as `UnsupportedModelType` rather than as a
//!   missing field.
//! - Deserialization validates that all parameters are finite and that every
//!   coefficient matrix is rectangular.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Matrix, MlpModel, Result, SourceModel};

pub const MODEL_FORMAT_VERSION: u32 = 1;

const CLASSIFIER: &str = "MLPClassifier";
const REGRESSOR: &str = "MLPRegressor";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedModel {
    pub format_version: u32,
    pub estimator: String,
    pub n_features_in: usize,
    pub hidden_layer_sizes: Vec<usize>,
    pub n_outputs: usize,
    pub activation: String,
    pub out_activation: String,
    /// One `(in_dim, out_dim)` matrix per dense layer, as nested rows.
    pub coefs: Vec<Vec<Vec<f32>>>,
    pub intercepts: Vec<Option<Vec<f32>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<SerializedLabel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedLabel {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SerializedLabel {
    /// Render the label the way numpy's `%s` formatting would.
    fn into_text(self) -> String {
        match self {
            SerializedLabel::Bool(true) => "True".to_owned(),
            SerializedLabel::Bool(false) => "False".to_owned(),
            SerializedLabel::Int(v) => v.to_string(),
            SerializedLabel::Float(v) => float_repr(v),
            SerializedLabel::Text(s) => s,
        }
    }
}

/// Python's `repr(float)`: shortest round-trip digits, exponent written as
/// `e+16` / `e-05`. Rust's `{:?}` switches to exponent form at the same
/// magnitudes but writes it as `e16` / `e-5`.
fn float_repr(v: f64) -> String {
    let s = format!("{v:?}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

fn check_estimator(name: &str) -> Result<()> {
    if name == CLASSIFIER || name == REGRESSOR {
        Ok(())
    } else {
        Err(Error::UnsupportedModelType(format!(
            "input model is {name}, expected {CLASSIFIER} or {REGRESSOR}"
        )))
    }
}

impl TryFrom<SerializedModel> for SourceModel {
    type Error = Error;

    fn try_from(value: SerializedModel) -> std::result::Result<Self, Self::Error> {
        check_estimator(&value.estimator)?;
        if value.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported model format_version {}; expected {}",
                value.format_version, MODEL_FORMAT_VERSION
            )));
        }

        let mut coefs = Vec::with_capacity(value.coefs.len());
        for (i, rows) in value.coefs.iter().enumerate() {
            if rows.iter().flatten().any(|v| !v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "layer {i} coefs must contain only finite values"
                )));
            }
            let m = Matrix::from_rows(rows)
                .map_err(|e| Error::InvalidData(format!("layer {i} coefs invalid: {e}")))?;
            coefs.push(m);
        }
        for (i, bias) in value.intercepts.iter().enumerate() {
            if let Some(b) = bias
                && b.iter().any(|v| !v.is_finite())
            {
                return Err(Error::InvalidData(format!(
                    "layer {i} intercepts must contain only finite values"
                )));
            }
        }

        let mlp = MlpModel {
            n_features_in: value.n_features_in,
            hidden_layer_sizes: value.hidden_layer_sizes,
            n_outputs: value.n_outputs,
            coefs,
            intercepts: value.intercepts,
            activation: value.activation,
            out_activation: value.out_activation,
        };
        mlp.validate()?;

        if value.estimator == CLASSIFIER {
            let classes = value.classes.ok_or_else(|| {
                Error::InvalidData(format!("{CLASSIFIER} export is missing \"classes\""))
            })?;
            Ok(SourceModel::Classifier {
                mlp,
                classes: classes.into_iter().map(SerializedLabel::into_text).collect(),
            })
        } else {
            Ok(SourceModel::Regressor { mlp })
        }
    }
}

impl From<&SourceModel> for SerializedModel {
    fn from(model: &SourceModel) -> Self {
        let mlp = model.mlp();
        let coefs = mlp
            .coefs
            .iter()
            .map(|m| {
                m.as_slice()
                    .chunks_exact(m.cols())
                    .map(<[f32]>::to_vec)
                    .collect()
            })
            .collect();

        Self {
            format_version: MODEL_FORMAT_VERSION,
            estimator: model.estimator_name().to_owned(),
            n_features_in: mlp.n_features_in,
            hidden_layer_sizes: mlp.hidden_layer_sizes.clone(),
            n_outputs: mlp.n_outputs,
            activation: mlp.activation.clone(),
            out_activation: mlp.out_activation.clone(),
            coefs,
            intercepts: mlp.intercepts.clone(),
            classes: model
                .classes()
                .map(|c| c.iter().cloned().map(SerializedLabel::Text).collect()),
        }
    }
}

impl SourceModel {
    /// Serialize the model to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let ser = SerializedModel::from(self);
        serde_json::to_string_pretty(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize model: {e}")))
    }

    /// Parse a model from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse model json: {e}")))?;

        let estimator = value
            .get("estimator")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                Error::UnsupportedModelType("model json has no \"estimator\" name".to_owned())
            })?;
        check_estimator(estimator)?;

        let ser: SerializedModel = serde_json::from_value(value)
            .map_err(|e| Error::InvalidData(format!("failed to parse model json: {e}")))?;
        ser.try_into()
    }

    /// Save the model to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        std::fs::write(path.as_ref(), s)?;
        Ok(())
    }

    /// Load a model from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&s)
    }
}
