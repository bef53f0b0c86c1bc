use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use gfx_maths::Vec4;
use log::debug;
use ml_format::material::Material;

use super::super::LoadError;

/// Looks `name` up in the OBJ's companion `.mtl` file (same basename,
/// `.mtl` extension).
///
/// A missing file or an unmatched name is not an error; both yield a
/// default material carrying the requested name.
pub(crate) fn find_material(obj_path: &Path, name: &str) -> Result<Material, LoadError> {
    let mtl_path = obj_path.with_extension("mtl");
    let file = match File::open(&mtl_path) {
        Ok(file) => file,
        Err(_) => {
            debug!("No material file at {}", mtl_path.display());
            return Ok(Material::named(name));
        }
    };

    scan(BufReader::new(file), name)
}

/// Scans MTL text for the `newmtl <name>` block and accumulates its
/// recognized fields until the next `newmtl`, a blank line, or the end of
/// the file (the final block has no trailing boundary marker).
pub(crate) fn scan<R: BufRead>(reader: R, name: &str) -> Result<Material, LoadError> {
    let mut material = Material::named(name);
    let mut capturing = false;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        let token = trimmed.split_whitespace().next().unwrap_or("");

        if capturing && (token == "newmtl" || trimmed.is_empty()) {
            // the target block is complete
            return Ok(material);
        }

        if token == "newmtl" {
            capturing = trimmed["newmtl".len()..].trim() == name;
            continue;
        }

        if capturing {
            apply_field(&mut material, token, trimmed)?;
        }
    }

    // the target was the last block in the file
    Ok(material)
}

fn apply_field(material: &mut Material, token: &str, line: &str) -> Result<(), LoadError> {
    let value = line[token.len()..].trim();

    match token {
        "Ns" => material.specular_exponent = Some(value.parse()?),
        "Ka" => material.ambient = Some(parse_vec3(value)?.into()),
        "Kd" => {
            let [r, g, b] = parse_vec3(value)?;
            material.diffuse = Some(Vec4::new(r, g, b, 1.0));
        }
        "Ks" => material.specular = Some(parse_vec3(value)?.into()),
        "Ke" => {
            let [r, g, b] = parse_vec3(value)?;
            material.emissive = Some(Vec4::new(r, g, b, 1.0));
        }
        "Ni" => material.optical_density = Some(value.parse()?),
        "d" => material.dissolve = Some(value.parse()?),
        "illum" => material.illumination = Some(value.parse()?),
        "map_Kd" => material.diffuse_map = Some(value.to_owned()),
        "map_d" => material.alpha_map = Some(value.to_owned()),
        _ => {}
    }

    Ok(())
}

fn parse_vec3(value: &str) -> Result<[f32; 3], LoadError> {
    let mut parts = value.split_whitespace();
    let mut out = [0.0f32; 3];
    for slot in out.iter_mut() {
        *slot = parts.next().unwrap_or_default().parse()?;
    }
    Ok(out)
}
