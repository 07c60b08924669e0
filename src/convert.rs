//! Conversion entry point: model in, `.param` / `.bin` (and class table) out.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{Graph, Result, SourceModel, ncnn, write_class_table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Output prefix; files are written to `<prefix>.param` and `<prefix>.bin`.
    pub prefix: PathBuf,
    /// Where classifiers write their class labels.
    pub class_table: PathBuf,
    /// Log the layer table (and class list) before writing.
    pub verbose: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prefix: PathBuf::from("ncnn"),
            class_table: PathBuf::from("class_table.txt"),
            verbose: false,
        }
    }
}

impl ConvertOptions {
    pub fn param_path(&self) -> PathBuf {
        with_suffix(&self.prefix, ".param")
    }

    pub fn bin_path(&self) -> PathBuf {
        with_suffix(&self.prefix, ".bin")
    }
}

// Appends rather than replacing an extension, so `model.v2` becomes `model.v2.param`.
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut s = prefix.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut w = BufWriter::new(File::create(path)?);
    write(&mut w)?;
    w.flush()?;
    Ok(())
}

/// Convert a trained MLP to ncnn.
///
/// Returns the `.param` and `.bin` paths. Classifiers also get a class table at
/// `opts.class_table`. Files written before a failure are left in place.
pub fn convert(model: &SourceModel, opts: &ConvertOptions) -> Result<(PathBuf, PathBuf)> {
    info!("input model is {} model", model.estimator_name());
    if model.classes().is_some() {
        info!("classes will be saved to {}", opts.class_table.display());
    }

    let graph = Graph::from_model(model.mlp())?;

    if opts.verbose {
        info!("layer summary:\n{}", graph.summary());
        if let Some(classes) = model.classes() {
            info!("classes: {classes:?}");
        }
    }

    let param = opts.param_path();
    let bin = opts.bin_path();
    write_file(&param, |w| ncnn::write_param(&graph, w))?;
    write_file(&bin, |w| ncnn::write_bin(&graph, w))?;
    info!(
        "model converted to {} and {}",
        param.display(),
        bin.display()
    );

    if let Some(classes) = model.classes() {
        write_file(&opts.class_table, |w| write_class_table(classes, w))?;
        info!("class table saved to {}", opts.class_table.display());
    }

    Ok((param, bin))
}

/// Load a JSON model export and convert it.
///
/// Nothing is written if the file cannot be loaded.
#[cfg(feature = "serde")]
pub fn convert_json_file<P: AsRef<Path>>(
    model_path: P,
    opts: &ConvertOptions,
) -> Result<(PathBuf, PathBuf)> {
    let model = SourceModel::load_json(model_path)?;
    convert(&model, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_append_suffix() {
        let opts = ConvertOptions {
            prefix: PathBuf::from("out/model.v2"),
            ..ConvertOptions::default()
        };
        assert_eq!(opts.param_path(), PathBuf::from("out/model.v2.param"));
        assert_eq!(opts.bin_path(), PathBuf::from("out/model.v2.bin"));
    }

    #[test]
    fn defaults_match_cli() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.param_path(), PathBuf::from("ncnn.param"));
        assert_eq!(opts.class_table, PathBuf::from("class_table.txt"));
        assert!(!opts.verbose);
    }
}
