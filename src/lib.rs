//! Convert trained dense MLPs to the ncnn inference format.
//!
//! `mlp2ncnn` takes the weights, biases and activations of a fitted
//! scikit-learn-style `MLPClassifier` / `MLPRegressor` and writes the two files
//! ncnn loads:
//!
//! - `<prefix>.param`: the layer graph as text;
//! - `<prefix>.bin`: the dense-layer weights as raw little-endian `f32`.
//!
//! # Pipeline
//!
//! 1. [`SourceModel`] / [`MlpModel`] hold the trained model.
//! 2. [`Graph::from_model`] maps it to a linear ncnn layer chain:
//!    `Input -> InnerProduct -> activation -> InnerProduct -> ...`.
//!    Activations go through [`map_activation`]; `identity` emits no layer.
//! 3. [`ncnn::write_param`] and [`ncnn::write_bin`] serialize the graph. Both
//!    walk the layers in the same order, which is how ncnn pairs weight blocks
//!    with `.param` lines.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f32`.
//! - Source weight matrices are row-major `(in_dim, out_dim)`, as scikit-learn
//!   stores `coefs_`.
//! - `.bin` weights are row-major `(out_dim, in_dim)`, i.e. transposed.
//!
//! # Quick start
//!
//! ```rust
//! use mlp2ncnn::{Graph, Matrix, MlpModel, ncnn};
//!
//! # fn main() -> mlp2ncnn::Result<()> {
//! let mlp = MlpModel {
//!     n_features_in: 4,
//!     hidden_layer_sizes: vec![3],
//!     n_outputs: 2,
//!     coefs: vec![
//!         Matrix::from_flat(vec![0.1; 12], 4, 3)?,
//!         Matrix::from_flat(vec![0.2; 6], 3, 2)?,
//!     ],
//!     intercepts: vec![Some(vec![0.0; 3]), Some(vec![0.0; 2])],
//!     activation: "tanh".to_owned(),
//!     out_activation: "identity".to_owned(),
//! };
//!
//! let graph = Graph::from_model(&mlp)?;
//! assert_eq!(graph.len(), 4);
//!
//! let mut param = Vec::new();
//! let mut bin = Vec::new();
//! ncnn::write_param(&graph, &mut param)?;
//! ncnn::write_bin(&graph, &mut bin)?;
//! assert!(param.starts_with(b"7767517\n4 4\n"));
//! assert_eq!(bin.len(), (4 + 12 * 4 + 3 * 4) + (4 + 6 * 4 + 2 * 4));
//! # Ok(())
//! # }
//! ```
//!
//! With the `serde` feature (on by default), [`convert_json_file`] loads a JSON
//! model export and writes all outputs in one call.

pub mod activation;
pub mod builder;
pub mod class_table;
pub mod convert;
pub mod error;
pub mod graph;
pub mod layer;
pub mod matrix;
pub mod model;
pub mod ncnn;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use activation::{Activation, ActivationNode, map_activation};
pub use builder::GraphBuilder;
pub use class_table::write_class_table;
pub use convert::{ConvertOptions, convert};
pub use error::{Error, Result};
pub use graph::Graph;
pub use layer::{InnerProduct, Layer, LayerHeader, LayerParams};
pub use matrix::Matrix;
pub use model::{MlpModel, SourceModel};

#[cfg(feature = "serde")]
pub use convert::convert_json_file;
