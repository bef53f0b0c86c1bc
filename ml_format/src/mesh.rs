use crate::error::Result;
use crate::material::Material;
use gfx_maths::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source format a mesh was assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Indexed, uv-textured geometry from a Wavefront OBJ file.
    Obj,
    /// Colored and optionally textured geometry from a COLLADA file.
    Dae,
}

/// Semantic role of a texture reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureKind {
    /// OBJ `map_Kd`.
    Diffuse,
    /// OBJ `map_d`.
    Alpha,
    /// COLLADA document-level `<image>` path.
    Map,
}

/// A resolved texture reference. The consumer decodes and uploads the
/// image; the loader only verifies the file exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub kind: TextureKind,
    pub path: PathBuf,
}

/// Flattened per-corner attribute arrays, one entry per triangle corner.
///
/// Shared corners are duplicated rather than welded, so every non-empty
/// array has the same length and the triangle count is `len / 3`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Vec4>,
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Checks the equal-length invariant across the populated arrays.
    pub fn is_consistent(&self) -> bool {
        let corners = self.positions.len();
        let agrees = |len: usize| len == 0 || len == corners;
        corners % 3 == 0
            && agrees(self.normals.len())
            && agrees(self.uvs.len())
            && agrees(self.colors.len())
    }
}

/// One renderable group of triangles sharing a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub format: SourceFormat,
    pub material_name: String,
    pub geometry: Geometry,
    pub material: Material,
    /// Directory the source file lives in, for resolving relative paths.
    pub base_dir: PathBuf,
    pub textures: Vec<Texture>,
}

/// The full result of loading one model file. Populated by a single parse
/// pass and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub path: PathBuf,
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize::<Model>(bytes)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Model::from_bytes(&data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_consistency() {
        let mut geometry = Geometry {
            positions: vec![Vec3::zero(); 6],
            normals: vec![Vec3::zero(); 6],
            uvs: Vec::new(),
            colors: Vec::new(),
        };
        assert!(geometry.is_consistent());
        assert_eq!(geometry.triangle_count(), 2);

        geometry.uvs = vec![Vec2::new(0.0, 0.0); 3];
        assert!(!geometry.is_consistent());
    }

    #[test]
    fn unmatched_material_is_just_a_name() {
        let material = Material::named("missing");
        assert_eq!(material.name, "missing");
        assert_eq!(material.diffuse, None);
        assert_eq!(material.diffuse_map, None);
    }
}
