//! ncnn `.param` / `.bin` writers.
//!
//! `.param` layout:
//!
//! ```text
//! 7767517
//! <layer_count> <blob_count>
//! <type:20><name:20> <n_in> <n_out> <inputs...> <outputs...> <id>=<value>...
//! ```
//!
//! `.bin` layout: for every `InnerProduct` layer in graph order, a 4-byte
//! little-endian `0` flag (plain float32 storage), the weights as
//! `(out_dim, in_dim)` row-major little-endian `f32`, then the bias when the
//! layer has one. There are no headers or separators; a loader finds block
//! boundaries by replaying `0=`, `1=` and `2=` from the `.param` file.

use std::io::Write;

use crate::{Graph, InnerProduct, Layer, LayerParams, Result};

/// Magic number on the first line of a `.param` file.
pub const PARAM_MAGIC: u32 = 7767517;

/// Flag preceding each weight block: unquantized float32 data.
pub const WEIGHT_FLAG_F32: i32 = 0;

const FIELD_WIDTH: usize = 20;

/// Render one `.param` layer line, without the trailing newline.
pub fn param_line(layer: &Layer) -> String {
    let mut line = format!(
        "{:<w$}{:<w$} {} {} {} {}",
        layer.type_name(),
        layer.name(),
        layer.inputs().len(),
        layer.outputs().len(),
        layer.inputs().join(" "),
        layer.outputs().join(" "),
        w = FIELD_WIDTH,
    );

    match &layer.params {
        LayerParams::Input { feature_count } => {
            line.push_str(&format!(" 0={feature_count}"));
        }
        LayerParams::InnerProduct(ip) => {
            line.push_str(&format!(
                " 0={} 1={} 2={}",
                ip.output_width,
                u8::from(ip.has_bias()),
                ip.weight_data_size()
            ));
        }
        LayerParams::Activation(_) => {}
    }
    line
}

/// Write the topology description.
pub fn write_param<W: Write>(graph: &Graph, w: &mut W) -> Result<()> {
    writeln!(w, "{PARAM_MAGIC}")?;
    writeln!(w, "{} {}", graph.len(), graph.blob_count())?;
    for layer in graph.layers() {
        writeln!(w, "{}", param_line(layer))?;
    }
    Ok(())
}

/// Encode the weight block of one dense layer.
pub fn weight_block(ip: &InnerProduct) -> Vec<u8> {
    let floats = ip.weight_data_size() + ip.bias.as_ref().map_or(0, Vec::len);
    let mut buf = Vec::with_capacity(4 + 4 * floats);

    buf.extend_from_slice(&WEIGHT_FLAG_F32.to_le_bytes());
    buf.extend(ip.weights.iter_transposed().flat_map(f32::to_le_bytes));
    if let Some(bias) = &ip.bias {
        buf.extend(bias.iter().flat_map(|v| v.to_le_bytes()));
    }
    buf
}

/// Write the binary weight data. Only `InnerProduct` layers contribute bytes.
pub fn write_bin<W: Write>(graph: &Graph, w: &mut W) -> Result<()> {
    for ip in graph.inner_products() {
        w.write_all(&weight_block(ip))?;
    }
    Ok(())
}
