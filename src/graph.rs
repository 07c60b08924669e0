//! The ncnn layer graph.
//!
//! A [`Graph`] is an ordered chain of layers, immutable once built. Both
//! writers in [`crate::ncnn`] walk it in the same order; the `.bin` loader
//! relies on that to pair weight blocks with `.param` lines.

use std::collections::HashSet;

use crate::{InnerProduct, Layer, LayerParams};

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    layers: Vec<Layer>,
}

impl Graph {
    pub(crate) fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of distinct blobs produced by the graph.
    ///
    /// Every layer here has exactly one output blob, so this equals `len()`,
    /// but it is counted rather than assumed.
    pub fn blob_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| l.outputs())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Dense layers in graph order.
    pub fn inner_products(&self) -> impl Iterator<Item = &InnerProduct> {
        self.layers.iter().filter_map(Layer::as_inner_product)
    }

    /// Human-readable layer table.
    ///
    /// ```text
    /// ================================================================================
    ///                                       INFO
    /// --------------------------------------------------------------------------------
    ///     Layer 1: Input
    ///         Input shape: (4,)
    /// --------------------------------------------------------------------------------
    ///     Layer 2: InnerProduct
    ///         Output shape: (3,)
    /// ================================================================================
    /// ```
    pub fn summary(&self) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        let mut out = String::new();
        out.push_str(&heavy);
        out.push('\n');
        out.push_str(&format!("{:^width$}\n", "INFO", width = RULE_WIDTH));
        out.push_str(&light);
        out.push('\n');

        for (idx, layer) in self.layers.iter().enumerate() {
            out.push_str(&format!("    Layer {}: {}\n", idx + 1, layer.type_name()));
            match &layer.params {
                LayerParams::Input { feature_count } => {
                    out.push_str(&format!("        Input shape: ({feature_count},)\n"));
                }
                LayerParams::InnerProduct(ip) => {
                    out.push_str(&format!("        Output shape: ({},)\n", ip.output_width));
                }
                LayerParams::Activation(_) => {}
            }
            if idx + 1 < self.layers.len() {
                out.push_str(&light);
                out.push('\n');
            }
        }

        out.push_str(&heavy);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{Activation, GraphBuilder, Matrix};

    fn graph_4_3_2() -> crate::Graph {
        GraphBuilder::new(4)
            .unwrap()
            .inner_product(Matrix::from_flat(vec![0.0; 12], 4, 3).unwrap(), None)
            .unwrap()
            .activation(Activation::Tanh)
            .unwrap()
            .inner_product(Matrix::from_flat(vec![0.0; 6], 3, 2).unwrap(), None)
            .unwrap()
            .build()
    }

    #[test]
    fn blob_count_matches_layer_count_for_a_chain() {
        let g = graph_4_3_2();
        assert_eq!(g.len(), 4);
        assert_eq!(g.blob_count(), 4);
    }

    #[test]
    fn summary_lists_every_layer() {
        let s = graph_4_3_2().summary();
        let lines: Vec<&str> = s.lines().collect();

        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[1].trim(), "INFO");
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[3], "    Layer 1: Input");
        assert_eq!(lines[4], "        Input shape: (4,)");
        assert_eq!(lines[6], "    Layer 2: InnerProduct");
        assert_eq!(lines[7], "        Output shape: (3,)");
        assert_eq!(lines[9], "    Layer 3: TanH");
        assert_eq!(lines[11], "    Layer 4: InnerProduct");
        assert_eq!(lines[12], "        Output shape: (2,)");
        assert_eq!(*lines.last().unwrap(), "=".repeat(80));
        assert_eq!(s.matches(&"-".repeat(80)).count(), 4);
    }
}
