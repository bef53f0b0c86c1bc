//! Loads text-based 3D geometry description files into renderer-ready
//! mesh collections.
//!
//! Supported inputs are Wavefront OBJ (with companion MTL material files)
//! and a line-oriented subset of COLLADA DAE. The result of [`load`] is an
//! [`ml_format::mesh::Model`]: flattened per-corner attribute arrays
//! grouped into meshes by material, with material properties and texture
//! file references attached. Windowing, shaders, GPU buffers and texture
//! decoding are the consumer's business.

pub mod mesh;

pub use mesh::{load, load_batch, LoadError};
