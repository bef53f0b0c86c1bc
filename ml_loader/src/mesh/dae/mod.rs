//! COLLADA `.dae` subset loading.
//!
//! Only a handful of tags matter here: `<float_array>` for attribute
//! pools, `<effect>` blocks for materials, `<image>` for the document's
//! texture path and `<triangles>`/`<input>`/`<p>` for index streams.
//! Everything else in the document is inert.

mod builder;
mod parser;

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use log::info;
use ml_format::mesh::Model;

use super::LoadError;

/// Loads a DAE file, emitting one mesh per `<triangles>` block.
pub fn load(path: &Path) -> Result<Model, LoadError> {
    let file = File::open(path)?;
    info!("Loading COLLADA `.dae` file: {}", path.display());
    parser::parse(BufReader::new(file), path)
}

/// Parses DAE text from memory. Texture lookups resolve against `path`
/// as if the text had been read from there.
pub fn load_str(contents: &str, path: &Path) -> Result<Model, LoadError> {
    parser::parse(io::Cursor::new(contents), path)
}
