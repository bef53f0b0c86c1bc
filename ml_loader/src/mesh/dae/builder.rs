use std::path::{Path, PathBuf};

use gfx_maths::{Vec2, Vec3, Vec4};
use log::{debug, error, warn};
use ml_format::material::Material;
use ml_format::mesh::{Geometry, Mesh, Model, SourceFormat, Texture, TextureKind};

use super::super::resolve::{self, IndexBase, OutOfBounds};
use super::super::LoadError;
use super::parser::{ArrayKind, EffectField, Record};

/// Attribute slot declared by an `<input>` line. Order of declaration
/// decides which column of the `<p>` list the slot owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Semantic {
    Position,
    Normal,
    Uv,
    Color,
    Other,
}

impl Semantic {
    fn from_name(name: &str) -> Self {
        match name {
            "POSITION" | "VERTEX" => Semantic::Position,
            "NORMAL" => Semantic::Normal,
            "TEXCOORD" => Semantic::Uv,
            "COLOR" | "COLOUR" => Semantic::Color,
            _ => Semantic::Other,
        }
    }
}

/// Geometry resolved at a `</triangles>` boundary, waiting for its
/// material to be paired up at the end of the document.
struct PendingMesh {
    material_name: String,
    geometry: Geometry,
}

/// Interprets the classified record stream for one DAE document.
///
/// Attribute pools are scoped to the enclosing `<mesh>` element and
/// cleared when it closes; index streams are scoped to one `<triangles>`
/// block. Materials and the texture path are document-wide.
pub(crate) struct DaeBuilder {
    path: PathBuf,
    base_dir: PathBuf,

    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    colors: Vec<Vec4>,

    in_triangles: bool,
    semantics: Vec<Semantic>,
    position_indices: Vec<u32>,
    normal_indices: Vec<u32>,
    uv_indices: Vec<u32>,
    color_indices: Vec<u32>,
    mesh_material: String,

    effect: Option<Material>,
    in_image: bool,
    texture_path: Option<String>,

    materials: Vec<Material>,
    pending: Vec<PendingMesh>,
}

impl DaeBuilder {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            in_triangles: false,
            semantics: Vec::new(),
            position_indices: Vec::new(),
            normal_indices: Vec::new(),
            uv_indices: Vec::new(),
            color_indices: Vec::new(),
            mesh_material: String::new(),
            effect: None,
            in_image: false,
            texture_path: None,
            materials: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn apply(&mut self, record: Record) {
        match record {
            Record::FloatArray { kind, values } => self.store_array(kind, &values),
            Record::EffectOpen { name } => self.effect = Some(Material::named(name)),
            Record::EffectValue { field, values } => self.store_effect_value(field, &values),
            Record::EffectClose => {
                if let Some(material) = self.effect.take() {
                    self.materials.push(material);
                }
            }
            Record::ImageOpen => self.in_image = true,
            Record::InitFrom { path } => {
                if self.in_image {
                    self.texture_path = Some(path);
                }
            }
            Record::ImageClose => self.in_image = false,
            Record::TrianglesOpen { material } => {
                self.in_triangles = true;
                self.mesh_material = material;
            }
            Record::Input { semantic } => {
                if self.in_triangles {
                    self.semantics.push(Semantic::from_name(&semantic));
                }
            }
            Record::Primitives { indices } => {
                if self.in_triangles {
                    self.store_indices(indices);
                }
            }
            Record::TrianglesClose => self.flush_mesh(),
            Record::MeshClose => self.clear_pools(),
            Record::Ignored => {}
        }
    }

    pub(crate) fn finish(self) -> Result<Model, LoadError> {
        if self.in_triangles {
            return Err(LoadError::DanglingIndices(self.path));
        }

        let texture = self.resolve_texture();
        let DaeBuilder {
            path,
            base_dir,
            materials,
            pending,
            ..
        } = self;

        let mut meshes = Vec::with_capacity(pending.len());
        for entry in pending {
            let material = materials
                .iter()
                .find(|m| m.name == entry.material_name)
                .cloned()
                .unwrap_or_else(|| Material::named(entry.material_name.as_str()));

            meshes.push(Mesh {
                format: SourceFormat::Dae,
                material_name: entry.material_name,
                geometry: entry.geometry,
                material,
                base_dir: base_dir.clone(),
                textures: texture.iter().cloned().collect(),
            });
        }

        if meshes.is_empty() {
            warn!("{} contained no triangle blocks", path.display());
        }

        Ok(Model { path, meshes })
    }

    // tuple widths are fixed per attribute kind; a partial trailing
    // group is dropped
    fn store_array(&mut self, kind: ArrayKind, values: &[f32]) {
        match kind {
            ArrayKind::Position => {
                for t in values.chunks_exact(3) {
                    self.positions.push(Vec3::new(t[0], t[1], t[2]));
                }
            }
            ArrayKind::Normal => {
                for t in values.chunks_exact(3) {
                    self.normals.push(Vec3::new(t[0], t[1], t[2]));
                }
            }
            ArrayKind::Uv => {
                for t in values.chunks_exact(2) {
                    self.uvs.push(Vec2::new(t[0], t[1]));
                }
            }
            ArrayKind::Color => {
                for t in values.chunks_exact(4) {
                    self.colors.push(Vec4::new(t[0], t[1], t[2], t[3]));
                }
            }
        }
    }

    fn store_effect_value(&mut self, field: EffectField, values: &[f32]) {
        let material = match self.effect.as_mut() {
            Some(material) => material,
            // colour lines outside an effect block belong to parts of
            // the document this subset does not model
            None => return,
        };

        match field {
            EffectField::Emission => material.emissive = rgba(values),
            EffectField::Diffuse => material.diffuse = rgba(values),
            EffectField::Specular => material.reflectivity = values.first().copied(),
            EffectField::Ior => material.optical_density = values.first().copied(),
        }
    }

    // the flat `<p>` list interleaves one index per declared input;
    // entry i belongs to the stream of the (i % stride)-th slot
    fn store_indices(&mut self, indices: Vec<u32>) {
        let stride = self.semantics.len().max(1);

        for (position, index) in indices.into_iter().enumerate() {
            match self.semantics.get(position % stride) {
                Some(Semantic::Position) => self.position_indices.push(index),
                Some(Semantic::Normal) => self.normal_indices.push(index),
                Some(Semantic::Uv) => self.uv_indices.push(index),
                Some(Semantic::Color) => self.color_indices.push(index),
                _ => {}
            }
        }
    }

    fn flush_mesh(&mut self) {
        self.in_triangles = false;

        match self.resolve_geometry() {
            Ok(geometry) => {
                debug!(
                    "Completed mesh `{}` with {} triangles",
                    self.mesh_material,
                    geometry.triangle_count()
                );
                self.pending.push(PendingMesh {
                    material_name: std::mem::take(&mut self.mesh_material),
                    geometry,
                });
            }
            // bad indices spoil this triangle block only; the rest of
            // the document still loads
            Err(err) => error!(
                "Dropping mesh `{}` from {}: {}",
                self.mesh_material,
                self.path.display(),
                err
            ),
        }

        self.clear_capture();
    }

    fn resolve_geometry(&self) -> Result<Geometry, OutOfBounds> {
        Ok(Geometry {
            positions: resolve::resolve(
                "position",
                &self.positions,
                &self.position_indices,
                IndexBase::Zero,
            )?,
            normals: resolve::resolve(
                "normal",
                &self.normals,
                &self.normal_indices,
                IndexBase::Zero,
            )?,
            uvs: resolve::resolve("uv", &self.uvs, &self.uv_indices, IndexBase::Zero)?,
            colors: resolve::resolve(
                "colour",
                &self.colors,
                &self.color_indices,
                IndexBase::Zero,
            )?,
        })
    }

    fn clear_capture(&mut self) {
        self.semantics.clear();
        self.position_indices.clear();
        self.normal_indices.clear();
        self.uv_indices.clear();
        self.color_indices.clear();
        self.mesh_material.clear();
    }

    fn clear_pools(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
    }

    fn resolve_texture(&self) -> Option<Texture> {
        let name = self.texture_path.as_deref()?;
        let path = self.base_dir.join(name);

        if path.is_file() {
            Some(Texture {
                kind: TextureKind::Map,
                path,
            })
        } else {
            warn!(
                "Could not load texture {} (the file may not exist)",
                path.display()
            );
            None
        }
    }
}

fn rgba(values: &[f32]) -> Option<Vec4> {
    match values {
        [r, g, b, a, ..] => Some(Vec4::new(*r, *g, *b, *a)),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::super::load_str;
    use super::*;
    use std::path::PathBuf;

    const RED_CUBE_FACE: &str = r#"<COLLADA>
  <library_effects>
    <effect id="red-effect">
      <color sid="emission">0 0 0 1</color>
      <color sid="diffuse">0.8 0.1 0.1 1</color>
      <float sid="specular">0.5</float>
      <float sid="ior">1.45</float>
    </effect>
  </library_effects>
  <library_geometries>
    <geometry id="Plane-mesh">
      <mesh>
        <float_array id="Plane-mesh-positions-array" count="9">0 0 0 1 0 0 0 1 0</float_array>
        <float_array id="Plane-mesh-normals-array" count="3">0 0 1</float_array>
        <triangles material="red-material" count="1">
          <input semantic="VERTEX" source="#Plane-mesh-vertices" offset="0"/>
          <input semantic="NORMAL" source="#Plane-mesh-normals" offset="1"/>
          <p>0 0 1 0 2 0</p>
        </triangles>
      </mesh>
    </geometry>
  </library_geometries>
</COLLADA>
"#;

    #[test]
    fn decodes_two_input_triangle_blocks() {
        let model = load_str(RED_CUBE_FACE, &PathBuf::from("red.dae")).unwrap();
        assert_eq!(model.meshes.len(), 1);

        let mesh = &model.meshes[0];
        assert_eq!(mesh.format, SourceFormat::Dae);
        assert_eq!(mesh.material_name, "red");

        let expected_positions: Vec<Vec3> =
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        assert_eq!(mesh.geometry.positions, expected_positions);
        // every corner reuses normal 0
        assert_eq!(mesh.geometry.normals, vec![Vec3::new(0.0, 0.0, 1.0); 3]);
        assert!(mesh.geometry.is_consistent());

        assert_eq!(mesh.material.diffuse, Some(Vec4::new(0.8, 0.1, 0.1, 1.0)));
        assert_eq!(mesh.material.reflectivity, Some(0.5));
        assert_eq!(mesh.material.optical_density, Some(1.45));
    }

    #[test]
    fn pools_reset_between_mesh_elements() {
        let source = r#"<COLLADA>
  <geometry><mesh>
    <float_array id="A-positions-array" count="3">1 1 1</float_array>
    <triangles material="a-material" count="1">
      <input semantic="VERTEX" source="#A-vertices" offset="0"/>
      <p>0 0 0</p>
    </triangles>
  </mesh></geometry>
  <geometry><mesh>
    <float_array id="B-positions-array" count="3">2 2 2</float_array>
    <triangles material="b-material" count="1">
      <input semantic="VERTEX" source="#B-vertices" offset="0"/>
      <p>0 0 0</p>
    </triangles>
  </mesh></geometry>
</COLLADA>
"#;
        let model = load_str(source, &PathBuf::from("two.dae")).unwrap();
        assert_eq!(model.meshes.len(), 2);
        // index 0 resolves against each element's own pool
        assert_eq!(model.meshes[0].geometry.positions[0], Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(model.meshes[1].geometry.positions[0], Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn corrupt_blocks_are_dropped_without_spoiling_the_file() {
        let source = r#"<COLLADA>
  <geometry><mesh>
    <float_array id="A-positions-array" count="3">1 1 1</float_array>
    <triangles material="bad-material" count="1">
      <input semantic="VERTEX" source="#A-vertices" offset="0"/>
      <p>7 7 7</p>
    </triangles>
    <triangles material="good-material" count="1">
      <input semantic="VERTEX" source="#A-vertices" offset="0"/>
      <p>0 0 0</p>
    </triangles>
  </mesh></geometry>
</COLLADA>
"#;
        let model = load_str(source, &PathBuf::from("partial.dae")).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].material_name, "good");
    }

    #[test]
    fn partial_trailing_tuples_are_dropped() {
        let mut builder = DaeBuilder::new(&PathBuf::from("t.dae"));
        builder.store_array(ArrayKind::Position, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(builder.positions, vec![Vec3::new(1.0, 2.0, 3.0)]);

        builder.store_array(ArrayKind::Uv, &[0.5, 0.5, 0.25]);
        assert_eq!(builder.uvs, vec![Vec2::new(0.5, 0.5)]);
    }

    #[test]
    fn per_corner_colors_resolve_like_any_other_attribute() {
        let source = r#"<COLLADA>
  <geometry><mesh>
    <float_array id="A-positions-array" count="9">0 0 0 1 0 0 0 1 0</float_array>
    <float_array id="A-colors-Col-array" count="8">1 0 0 1 0 1 0 1</float_array>
    <triangles material="paint-material" count="1">
      <input semantic="VERTEX" source="#A-vertices" offset="0"/>
      <input semantic="COLOR" source="#A-colors" offset="1"/>
      <p>0 0 1 1 2 0</p>
    </triangles>
  </mesh></geometry>
</COLLADA>
"#;
        let model = load_str(source, &PathBuf::from("paint.dae")).unwrap();
        let colors = &model.meshes[0].geometry.colors;
        assert_eq!(
            colors,
            &vec![
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 1.0, 0.0, 1.0),
                Vec4::new(1.0, 0.0, 0.0, 1.0),
            ]
        );
    }

    #[test]
    fn a_file_ending_mid_triangle_list_is_an_error() {
        let source = r#"<COLLADA>
  <geometry><mesh>
    <float_array id="A-positions-array" count="3">1 1 1</float_array>
    <triangles material="a-material" count="1">
      <input semantic="VERTEX" source="#A-vertices" offset="0"/>
"#;
        let err = load_str(source, &PathBuf::from("cut.dae")).unwrap_err();
        assert!(matches!(err, LoadError::DanglingIndices(_)));
    }
}
