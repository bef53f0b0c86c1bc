use std::io::BufRead;
use std::path::Path;

use ml_format::mesh::Model;

use super::super::LoadError;
use super::builder::DaeBuilder;

// not general XML parsing: tags are sniffed by substring and payloads
// taken between the first `>` and the last `<` of a line, which is as
// much structure as the exporter output this targets ever uses
pub(crate) fn parse<R: BufRead>(reader: R, path: &Path) -> Result<Model, LoadError> {
    let mut builder = DaeBuilder::new(path);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        builder.apply(classify(&line)?);
    }

    builder.finish()
}

/// Which attribute pool a `<float_array>` feeds, decided by a name
/// substring heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArrayKind {
    Position,
    Normal,
    Uv,
    Color,
}

/// Material field addressed by a `<color>`/`<float>` line inside an
/// effect block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EffectField {
    Emission,
    Diffuse,
    Specular,
    Ior,
}

/// One recognized line of the COLLADA subset.
#[derive(Debug, PartialEq)]
pub(crate) enum Record {
    FloatArray { kind: ArrayKind, values: Vec<f32> },
    EffectOpen { name: String },
    EffectValue { field: EffectField, values: Vec<f32> },
    EffectClose,
    ImageOpen,
    InitFrom { path: String },
    ImageClose,
    TrianglesOpen { material: String },
    Input { semantic: String },
    Primitives { indices: Vec<u32> },
    TrianglesClose,
    MeshClose,
    Ignored,
}

pub(crate) fn classify(line: &str) -> Result<Record, LoadError> {
    if line.contains("<float_array") {
        let kind = if line.contains("positions-array") {
            Some(ArrayKind::Position)
        } else if line.contains("normals-array") {
            Some(ArrayKind::Normal)
        } else if line.contains("map") {
            Some(ArrayKind::Uv)
        } else if line.contains("colour") || line.contains("color") {
            Some(ArrayKind::Color)
        } else {
            None
        };

        return Ok(match kind {
            Some(kind) => Record::FloatArray {
                kind,
                values: parse_floats(payload(line))?,
            },
            None => Record::Ignored,
        });
    }

    if line.contains("</effect>") {
        return Ok(Record::EffectClose);
    }
    if line.contains("<effect") {
        return Ok(match attr_between(line, "id=\"", "-effect\"") {
            Some(name) => Record::EffectOpen {
                name: name.to_owned(),
            },
            None => Record::Ignored,
        });
    }
    if line.contains("<color") || line.contains("<float") {
        let field = if line.contains("sid=\"emission\"") {
            Some(EffectField::Emission)
        } else if line.contains("sid=\"diffuse\"") {
            Some(EffectField::Diffuse)
        } else if line.contains("sid=\"specular\"") {
            Some(EffectField::Specular)
        } else if line.contains("sid=\"ior\"") {
            Some(EffectField::Ior)
        } else {
            None
        };

        return Ok(match field {
            Some(field) => Record::EffectValue {
                field,
                values: parse_floats(payload(line))?,
            },
            None => Record::Ignored,
        });
    }

    if line.contains("</image>") {
        return Ok(Record::ImageClose);
    }
    if line.contains("<image") {
        return Ok(Record::ImageOpen);
    }
    if line.contains("<init_from>") {
        return Ok(Record::InitFrom {
            path: payload(line).to_owned(),
        });
    }

    if line.contains("</triangles>") {
        return Ok(Record::TrianglesClose);
    }
    if line.contains("<triangles") {
        return Ok(match attr_between(line, "material=\"", "-material\"") {
            Some(material) => Record::TrianglesOpen {
                material: material.to_owned(),
            },
            None => Record::Ignored,
        });
    }
    if line.contains("<input") {
        return Ok(match attr_between(line, "semantic=\"", "\"") {
            Some(semantic) => Record::Input {
                semantic: semantic.to_owned(),
            },
            None => Record::Ignored,
        });
    }
    if line.contains("<p>") {
        return Ok(Record::Primitives {
            indices: parse_indices(payload(line))?,
        });
    }

    if line.contains("</mesh>") {
        return Ok(Record::MeshClose);
    }

    Ok(Record::Ignored)
}

// text between the first `>` and the last `<` of the line
fn payload(line: &str) -> &str {
    let start = match line.find('>') {
        Some(i) => i + 1,
        None => return "",
    };
    let end = match line.rfind('<') {
        Some(i) => i,
        None => return "",
    };
    if start <= end {
        &line[start..end]
    } else {
        ""
    }
}

fn attr_between<'a>(line: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    let start = line.find(prefix)? + prefix.len();
    let end = line[start..].find(suffix)? + start;
    Some(&line[start..end])
}

fn parse_floats(value: &str) -> Result<Vec<f32>, LoadError> {
    value
        .split_whitespace()
        .map(|token| token.parse().map_err(LoadError::from))
        .collect()
}

fn parse_indices(value: &str) -> Result<Vec<u32>, LoadError> {
    value
        .split_whitespace()
        .map(|token| token.parse().map_err(LoadError::from))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifies_float_arrays_by_name() -> Result<(), LoadError> {
        assert_eq!(
            classify(r#"<float_array id="Cube-mesh-positions-array" count="6">1 2 3 4 5 6</float_array>"#)?,
            Record::FloatArray {
                kind: ArrayKind::Position,
                values: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            }
        );
        assert_eq!(
            classify(r#"<float_array id="Cube-mesh-normals-array" count="3">0 0 1</float_array>"#)?,
            Record::FloatArray {
                kind: ArrayKind::Normal,
                values: vec![0.0, 0.0, 1.0],
            }
        );
        assert_eq!(
            classify(r#"<float_array id="Cube-mesh-map-0-array" count="2">0.5 0.5</float_array>"#)?,
            Record::FloatArray {
                kind: ArrayKind::Uv,
                values: vec![0.5, 0.5],
            }
        );
        assert_eq!(
            classify(r#"<float_array id="Cube-mesh-colors-Col-array" count="4">1 0 0 1</float_array>"#)?,
            Record::FloatArray {
                kind: ArrayKind::Color,
                values: vec![1.0, 0.0, 0.0, 1.0],
            }
        );
        Ok(())
    }

    #[test]
    fn strips_the_effect_suffix_from_ids() -> Result<(), LoadError> {
        assert_eq!(
            classify(r#"<effect id="red-effect">"#)?,
            Record::EffectOpen { name: "red".into() }
        );
        assert_eq!(
            classify(r#"<triangles material="red-material" count="12">"#)?,
            Record::TrianglesOpen {
                material: "red".into()
            }
        );
        Ok(())
    }

    #[test]
    fn extracts_effect_values_by_sid() -> Result<(), LoadError> {
        assert_eq!(
            classify(r#"<color sid="diffuse">0.8 0.1 0.1 1</color>"#)?,
            Record::EffectValue {
                field: EffectField::Diffuse,
                values: vec![0.8, 0.1, 0.1, 1.0],
            }
        );
        assert_eq!(
            classify(r#"<float sid="ior">1.45</float>"#)?,
            Record::EffectValue {
                field: EffectField::Ior,
                values: vec![1.45],
            }
        );
        assert_eq!(classify(r#"<float sid="shininess">50</float>"#)?, Record::Ignored);
        Ok(())
    }

    #[test]
    fn extracts_input_semantics_and_index_lists() -> Result<(), LoadError> {
        assert_eq!(
            classify(r#"<input semantic="VERTEX" source="#Cube-mesh-vertices" offset="0"/>"#)?,
            Record::Input {
                semantic: "VERTEX".into()
            }
        );
        assert_eq!(
            classify("<p>0 0 1 0 2 0</p>")?,
            Record::Primitives {
                indices: vec![0, 0, 1, 0, 2, 0],
            }
        );
        Ok(())
    }

    #[test]
    fn unrecognized_tags_are_inert() -> Result<(), LoadError> {
        assert_eq!(classify(r#"<library_geometries>"#)?, Record::Ignored);
        assert_eq!(classify(r#"<vertices id="Cube-mesh-vertices">"#)?, Record::Ignored);
        Ok(())
    }
}
