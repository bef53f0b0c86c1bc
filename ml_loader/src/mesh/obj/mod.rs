//! Wavefront OBJ loading with companion MTL material resolution.

mod builder;
mod meta;
mod mtl;
mod parser;

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use log::info;
use ml_format::mesh::Model;

use self::meta::ImportMeta;
use super::LoadError;

/// Loads an OBJ file, splitting it into one mesh per material/object
/// boundary and resolving each mesh's material from the companion MTL.
pub fn load(path: &Path) -> Result<Model, LoadError> {
    let file = File::open(path)?;
    info!("Loading Wavefront `.obj` file: {}", path.display());
    let meta = ImportMeta::resolve(path)?;
    parser::parse(BufReader::new(file), path, meta)
}

/// Parses OBJ text from memory. Material and texture lookups resolve
/// against `path` as if the text had been read from there.
pub fn load_str(contents: &str, path: &Path) -> Result<Model, LoadError> {
    parser::parse(io::Cursor::new(contents), path, ImportMeta::default())
}
