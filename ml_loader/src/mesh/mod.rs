//! Model loading: file-extension dispatch and the error taxonomy shared
//! by the format parsers.

pub mod dae;
pub mod obj;
pub(crate) mod resolve;

use std::{
    io, num,
    path::{Path, PathBuf},
};

use ml_format::mesh::Model;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] io::Error),
    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("Failed to parse float value: {0}")]
    ParseFloat(#[from] num::ParseFloatError),
    #[error("Failed to parse index value: {0}")]
    ParseInt(#[from] num::ParseIntError),
    #[error("Invalid import meta file: {0}")]
    Meta(#[from] toml::de::Error),
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("Malformed face on line {line}: {reason}")]
    MalformedFace { line: usize, reason: String },
    #[error("Corrupt geometry in {path}: {detail}")]
    CorruptIndices { path: PathBuf, detail: String },
    #[error("{0} ended inside an unfinished triangle list")]
    DanglingIndices(PathBuf),
}

/// Loads one model file, picking the parser from the file extension.
pub fn load(path: impl AsRef<Path>) -> Result<Model, LoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| LoadError::UnsupportedExtension(path.to_path_buf()))?;

    match extension.as_str() {
        "obj" => obj::load(path),
        "dae" => dae::load(path),
        _ => Err(LoadError::UnsupportedExtension(path.to_path_buf())),
    }
}

/// Loads a batch of model files sequentially.
///
/// Each file owns its parser state, so a failure stays local to its slot;
/// result order matches input order.
pub fn load_batch<P: AsRef<Path>>(paths: &[P]) -> Vec<(PathBuf, Result<Model, LoadError>)> {
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref().to_path_buf();
            let result = load(&path);
            (path, result)
        })
        .collect()
}
