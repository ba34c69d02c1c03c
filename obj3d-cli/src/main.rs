//! obj3d - Wavefront OBJ inspector
//!
//! Loads a model with its material libraries and prints counts, extents and
//! material usage.
//!
//! Usage:
//!   obj3d model.obj
//!   obj3d model.obj --resource-dir assets/ --strict

use clap::Parser;
use obj3d_core::{DecoderConfig, DirectoryResources, ObjLoader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "obj3d", author, version, about = "Inspect Wavefront OBJ models", long_about = None)]
struct Args {
    /// Path to the .obj file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Directory to resolve mtllib files from (defaults to the model's directory)
    #[arg(long, value_name = "DIR")]
    resource_dir: Option<PathBuf>,

    /// Fail if any line needed recovery
    #[arg(long)]
    strict: bool,

    /// Don't load material libraries
    #[arg(long)]
    no_materials: bool,

    /// Logging verbosity level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    let config = DecoderConfig::new()
        .with_strict(args.strict)
        .with_materials(!args.no_materials);

    let resource_dir = args.resource_dir.clone().unwrap_or_else(|| {
        args.file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    let resources = DirectoryResources::new(resource_dir);

    info!("Loading {}", args.file.display());
    let result = ObjLoader::new(&resources)
        .with_config(config)
        .load_streams(|| File::open(&args.file).map(BufReader::new));

    match result {
        Ok(model) => {
            print!("{}", model.report());
            for failure in &model.failures {
                println!("  {}", failure);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to load {}: {}", args.file.display(), e);
            eprintln!("Failed to load {}: {}", args.file.display(), e);
            ExitCode::FAILURE
        }
    }
}
