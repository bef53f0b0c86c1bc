use gfx_maths::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Named bundle of lighting coefficients and texture map references.
///
/// Fields the source material block never set stay `None`. A mesh whose
/// material could not be matched carries a `Material` with only the name
/// filled in; that is a valid "no material" value, not a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// `Ns`, specular exponent.
    pub specular_exponent: Option<f32>,
    /// `Ka`, ambient colour.
    pub ambient: Option<Vec3>,
    /// `Kd` or `<color sid="diffuse">`. Alpha is 1 for OBJ sources.
    pub diffuse: Option<Vec4>,
    /// `Ks`, specular colour.
    pub specular: Option<Vec3>,
    /// `Ke` or `<color sid="emission">`. Alpha is 1 for OBJ sources.
    pub emissive: Option<Vec4>,
    /// `<float sid="specular">`, scalar specular reflectivity.
    pub reflectivity: Option<f32>,
    /// `Ni` or `<float sid="ior">`, optical density.
    pub optical_density: Option<f32>,
    /// `d`, dissolve (alpha).
    pub dissolve: Option<f32>,
    /// `illum`, illumination model id.
    pub illumination: Option<i32>,
    /// `map_Kd`, diffuse texture map file name.
    pub diffuse_map: Option<String>,
    /// `map_d`, alpha texture map file name.
    pub alpha_map: Option<String>,
}

impl Material {
    /// A material with only the name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
