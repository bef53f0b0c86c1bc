use std::path::{Path, PathBuf};

use gfx_maths::{Vec2, Vec3};
use log::{debug, warn};
use ml_format::material::Material;
use ml_format::mesh::{Geometry, Mesh, Model, SourceFormat, Texture, TextureKind};

use super::super::resolve::{self, IndexBase, OutOfBounds};
use super::super::LoadError;
use super::meta::ImportMeta;
use super::mtl;
use super::parser::Face;

/// Owns the attribute pools and index streams for one OBJ file and turns
/// them into completed meshes at material/object boundaries.
///
/// The pools span the whole file and are never cleared; the index streams
/// are reset every time a mesh is flushed.
pub(crate) struct ObjBuilder {
    path: PathBuf,
    base_dir: PathBuf,
    meta: ImportMeta,

    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,

    position_indices: Vec<u32>,
    uv_indices: Vec<u32>,
    normal_indices: Vec<u32>,

    material_name: String,
    meshes: Vec<Mesh>,
}

impl ObjBuilder {
    pub(crate) fn new(path: &Path, meta: ImportMeta) -> Self {
        Self {
            path: path.to_path_buf(),
            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            meta,
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            position_indices: Vec::new(),
            uv_indices: Vec::new(),
            normal_indices: Vec::new(),
            material_name: String::new(),
            meshes: Vec::new(),
        }
    }

    pub(crate) fn push_position(&mut self, mut position: [f32; 3]) {
        for axis in 0..3 {
            if self.meta.flip_axis[axis] {
                position[axis] = -position[axis];
            }
        }
        self.positions.push(position.into());
    }

    pub(crate) fn push_uv(&mut self, uv: [f32; 2]) {
        self.uvs.push(uv.into());
    }

    pub(crate) fn push_normal(&mut self, mut normal: [f32; 3]) {
        for axis in 0..3 {
            if self.meta.flip_axis[axis] {
                normal[axis] = -normal[axis];
            }
        }
        self.normals.push(normal.into());
    }

    /// Faces that follow belong to this material until the next boundary.
    pub(crate) fn set_material(&mut self, name: String) {
        self.material_name = name;
    }

    pub(crate) fn push_face(&mut self, face: Face) {
        // quads fan-split across the corner 0 to corner 2 diagonal
        let order: &[usize] = match face.corners.len() {
            3 => &[0, 1, 2],
            _ => &[0, 1, 2, 2, 3, 0],
        };

        for &slot in order {
            let corner = face.corners[slot];
            self.position_indices.push(corner.position);
            self.uv_indices.push(corner.uv);
            self.normal_indices.push(corner.normal);
        }
    }

    /// Resolves the accumulated index streams into one completed mesh and
    /// resets them. The current material name carries over.
    pub(crate) fn flush_mesh(&mut self) -> Result<(), LoadError> {
        let geometry = self.resolve_geometry()?;
        let material = mtl::find_material(&self.path, &self.material_name)?;
        let textures = self.resolve_textures(&material);

        debug!(
            "Completed mesh `{}` with {} triangles",
            self.material_name,
            geometry.triangle_count()
        );

        self.meshes.push(Mesh {
            format: SourceFormat::Obj,
            material_name: self.material_name.clone(),
            geometry,
            material,
            base_dir: self.base_dir.clone(),
            textures,
        });

        self.position_indices.clear();
        self.uv_indices.clear();
        self.normal_indices.clear();

        Ok(())
    }

    pub(crate) fn finish(self) -> Result<Model, LoadError> {
        if !self.position_indices.is_empty()
            || !self.uv_indices.is_empty()
            || !self.normal_indices.is_empty()
        {
            return Err(LoadError::DanglingIndices(self.path));
        }

        if self.meshes.is_empty() {
            warn!("{} contained no faces", self.path.display());
        }

        Ok(Model {
            path: self.path,
            meshes: self.meshes,
        })
    }

    // any index past its pool means the file promises vertices it never
    // defined; the whole load is abandoned rather than emitting a
    // partially wrong model
    fn resolve_geometry(&self) -> Result<Geometry, LoadError> {
        let corrupt = |err: OutOfBounds| LoadError::CorruptIndices {
            path: self.path.clone(),
            detail: err.to_string(),
        };

        Ok(Geometry {
            positions: resolve::resolve(
                "position",
                &self.positions,
                &self.position_indices,
                IndexBase::One,
            )
            .map_err(corrupt)?,
            uvs: resolve::resolve("uv", &self.uvs, &self.uv_indices, IndexBase::One)
                .map_err(corrupt)?,
            normals: resolve::resolve(
                "normal",
                &self.normals,
                &self.normal_indices,
                IndexBase::One,
            )
            .map_err(corrupt)?,
            colors: Vec::new(),
        })
    }

    fn resolve_textures(&self, material: &Material) -> Vec<Texture> {
        let maps = [
            (TextureKind::Diffuse, material.diffuse_map.as_deref()),
            (TextureKind::Alpha, material.alpha_map.as_deref()),
        ];

        let mut textures = Vec::new();
        for (kind, name) in maps {
            let name = match name {
                Some(name) => name,
                None => continue,
            };
            let path = self.base_dir.join(name);
            if path.is_file() {
                textures.push(Texture { kind, path });
            } else {
                warn!(
                    "Could not load texture {} (the file may not exist)",
                    path.display()
                );
            }
        }
        textures
    }
}
