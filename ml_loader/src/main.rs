pub(crate) mod utils;

use anyhow::Result;
use log::{debug, error, info, warn};
use ml_format::mesh::Model;
use ml_loader::mesh;
use std::{
    fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use walkdir::WalkDir;

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "ml_loader")]
struct CliArgs {
    /// Model file, or folder of model files, to load
    input: String,
    /// Directory to write the loaded models into, serialized
    #[structopt(short = "o", long = "output")]
    output: Option<String>,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

/// Happens during setup
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input path does not exist: {0}")]
    InputNonExistant(String),
    #[error("Output folder could not be created: {0}")]
    ErrorCreatingOutput(#[from] std::io::Error),
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    run(args)
}

fn run(args: CliArgs) -> Result<()> {
    let input_path = Path::new(&args.input);
    if !input_path.exists() {
        return Err(CliError::InputNonExistant(args.input.clone()).into());
    }

    let output_dir = match &args.output {
        Some(output) => {
            let dir = PathBuf::from(output);
            if !dir.exists() {
                fs::create_dir_all(&dir).map_err(CliError::ErrorCreatingOutput)?;
            }
            Some(dir)
        }
        None => None,
    };

    let paths = collect_model_paths(input_path);
    if paths.is_empty() {
        warn!("No model files found under {}", input_path.display());
        return Ok(());
    }

    // a broken file is reported and skipped; the rest of the batch loads
    for (path, result) in mesh::load_batch(&paths) {
        match result {
            Ok(model) => {
                report(&model);
                if let Some(dir) = &output_dir {
                    save(&model, dir)?;
                }
            }
            Err(err) => error!("Skipping {}: {}", path.display(), err),
        }
    }

    Ok(())
}

fn collect_model_paths(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error walking input folder: {}", err);
                continue;
            }
        };

        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        if let Some(Some(extension)) = path.extension().map(|x| x.to_str()) {
            match extension.to_ascii_lowercase().as_ref() {
                "obj" | "dae" => paths.push(path.to_path_buf()),
                "fbx" | "3ds" => warn!(
                    "Proprietary format is not supported yet: {}",
                    path.display()
                ),
                // companion files are picked up alongside their model
                "mtl" | "toml" | "png" | "jpg" => {
                    debug!("Ignored companion file: {}", path.display())
                }
                _ => warn!("Could not handle path: {}", path.display()),
            }
        }
    }

    paths
}

fn report(model: &Model) {
    let triangles: usize = model
        .meshes
        .iter()
        .map(|m| m.geometry.triangle_count())
        .sum();
    info!(
        "Loaded {}: {} meshes, {} triangles",
        model.path.display(),
        model.meshes.len(),
        triangles
    );

    for mesh in &model.meshes {
        debug!(
            "  mesh `{}`: {} triangles, {} textures",
            mesh.material_name,
            mesh.geometry.triangle_count(),
            mesh.textures.len()
        );
    }
}

fn save(model: &Model, output_dir: &Path) -> Result<()> {
    let file_name = utils::file_name(&model.path)?;
    let target = utils::combine_path(output_dir, file_name, "mlm");
    utils::write_file(&target, &model.to_bytes()?)?;
    info!("Wrote {}", target.display());
    Ok(())
}
