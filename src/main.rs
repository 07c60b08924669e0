//! mlp2ncnn command-line tool.
//!
//! Usage:
//!   mlp2ncnn -s model.json [-n ncnn] [-c class_table.txt]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mlp2ncnn::{ConvertOptions, convert_json_file};
use tracing_subscriber::EnvFilter;

/// Convert a scikit-learn MLP model to ncnn.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the exported scikit-learn MLP model (JSON)
    #[arg(short = 's', long = "skl-mlp")]
    skl_mlp: PathBuf,
    /// Prefix of the converted ncnn model
    #[arg(short = 'n', long = "ncnn", default_value = "ncnn")]
    ncnn: PathBuf,
    /// Path to the class table file for MLPClassifier
    #[arg(short = 'c', long = "class-table", default_value = "class_table.txt")]
    class_table: PathBuf,
}

impl Args {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            prefix: self.ncnn.clone(),
            class_table: self.class_table.clone(),
            verbose: true,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match convert_json_file(&args.skl_mlp, &args.convert_options()) {
        Ok((param, bin)) => {
            println!("{}\n{}", param.display(), bin.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_model_is_given() {
        let args = Args::try_parse_from(["mlp2ncnn", "-s", "model.json"]).unwrap();
        let opts = args.convert_options();
        assert_eq!(args.skl_mlp, PathBuf::from("model.json"));
        assert_eq!(opts.prefix, PathBuf::from("ncnn"));
        assert_eq!(opts.class_table, PathBuf::from("class_table.txt"));
        assert!(opts.verbose);
    }

    #[test]
    fn long_and_short_flags_set_outputs() {
        let args = Args::try_parse_from([
            "mlp2ncnn",
            "--skl-mlp",
            "model.json",
            "-n",
            "out/model",
            "--class-table",
            "out/classes.txt",
        ])
        .unwrap();
        assert_eq!(args.ncnn, PathBuf::from("out/model"));
        assert_eq!(args.class_table, PathBuf::from("out/classes.txt"));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Args::try_parse_from(["mlp2ncnn", "-s", "model.json", "--ncn", "out/model"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn flag_without_value_is_rejected() {
        assert!(Args::try_parse_from(["mlp2ncnn", "-s", "model.json", "-n"]).is_err());
    }

    #[test]
    fn model_path_is_required() {
        let err = Args::try_parse_from(["mlp2ncnn", "-n", "out/model"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
