use std::io::{self, BufRead};
use std::path::Path;

use log::debug;
use ml_format::mesh::Model;

use super::super::LoadError;
use super::builder::ObjBuilder;
use super::meta::ImportMeta;

// parses wavefront obj (https://en.wikipedia.org/wiki/Wavefront_.obj_file)
// restricted to the `v`/`vt`/`vn`/`usemtl`/`o`/`f` records; everything
// else is inert for forward compatibility
pub(crate) fn parse<R: BufRead>(
    reader: R,
    path: &Path,
    meta: ImportMeta,
) -> Result<Model, LoadError> {
    let mut builder = ObjBuilder::new(path, meta);
    let mut lines = reader.lines().peekable();
    let mut line_no = 0;

    while let Some(line) = lines.next() {
        let line = line?;
        line_no += 1;

        if line.trim().is_empty() {
            continue;
        }

        debug!("Parsing: \"{}\"", line);

        match classify(&line, line_no)? {
            Record::Position(position) => builder.push_position(position),
            Record::Uv(uv) => builder.push_uv(uv),
            Record::Normal(normal) => builder.push_normal(normal),
            Record::UseMaterial(name) => builder.set_material(name),
            Record::Object(_) => {} // only meaningful as a mesh boundary
            Record::Face(face) => {
                builder.push_face(face);
                if mesh_boundary(lines.peek()) {
                    builder.flush_mesh()?;
                }
            }
            Record::Ignored => {}
        }
    }

    builder.finish()
}

// One line of lookahead: a mesh ends when the upcoming line starts a new
// material or object, is blank, or the file is out of lines.
fn mesh_boundary(peek: Option<&io::Result<String>>) -> bool {
    match peek {
        None => true,
        // the read error itself surfaces on the next loop iteration
        Some(Err(_)) => true,
        Some(Ok(line)) => {
            let upcoming = line.trim_start();
            upcoming.is_empty() || upcoming.starts_with("usemtl") || upcoming.starts_with("o ")
        }
    }
}

/// One classified OBJ record.
#[derive(Debug, PartialEq)]
pub(crate) enum Record {
    Position([f32; 3]),
    Uv([f32; 2]),
    Normal([f32; 3]),
    UseMaterial(String),
    Object(String),
    Face(Face),
    Ignored,
}

/// A face record names 3 or 4 corners; every corner carries the same
/// three index slots.
#[derive(Debug, PartialEq)]
pub(crate) struct Face {
    pub(crate) corners: Vec<Corner>,
}

/// One corner of a face: 1-based indices into the position/uv/normal
/// pools accumulated so far in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Corner {
    pub(crate) position: u32,
    pub(crate) uv: u32,
    pub(crate) normal: u32,
}

pub(crate) fn classify(line: &str, line_no: usize) -> Result<Record, LoadError> {
    let trimmed = line.trim();
    let (token, value) = match trimmed.split_once(char::is_whitespace) {
        Some((token, value)) => (token, value.trim()),
        None => (trimmed, ""),
    };

    let record = match token {
        "v" => Record::Position(parse_floats(value, line_no)?),
        "vt" => Record::Uv(parse_floats(value, line_no)?),
        "vn" => Record::Normal(parse_floats(value, line_no)?),
        "usemtl" => Record::UseMaterial(value.to_owned()),
        "o" => Record::Object(value.to_owned()),
        "f" => Record::Face(parse_face(value, line_no)?),
        "#" => {
            debug!("Comment: {:?}", value);
            Record::Ignored
        }
        // the material file is located by basename, not by this record
        "mtllib" => Record::Ignored,
        _ => Record::Ignored,
    };

    Ok(record)
}

fn parse_floats<const N: usize>(value: &str, line_no: usize) -> Result<[f32; N], LoadError> {
    let mut out = [0.0; N];
    let mut parts = value.split_whitespace();

    for slot in out.iter_mut() {
        let token = parts.next().ok_or_else(|| LoadError::MalformedRecord {
            line: line_no,
            reason: format!("expected {} numeric fields, got \"{}\"", N, value),
        })?;
        *slot = token.parse()?;
    }

    Ok(out)
}

// a face line holds space-separated `v/vt/vn` corner groups; the corner
// count comes from the slash count, two slashes per corner
fn parse_face(value: &str, line_no: usize) -> Result<Face, LoadError> {
    let slash_count = value.matches('/').count();
    let corner_count = slash_count / 2;
    let tokens: Vec<&str> = value.split_whitespace().collect();

    if slash_count % 2 != 0 || corner_count != tokens.len() {
        return Err(LoadError::MalformedFace {
            line: line_no,
            reason: format!("corners must be `v/vt/vn` groups, got \"{}\"", value),
        });
    }
    if corner_count != 3 && corner_count != 4 {
        return Err(LoadError::MalformedFace {
            line: line_no,
            reason: format!("expected 3 or 4 corners, got {}", corner_count),
        });
    }

    let mut corners = Vec::with_capacity(corner_count);
    for token in tokens {
        corners.push(parse_corner(token, line_no)?);
    }

    Ok(Face { corners })
}

fn parse_corner(token: &str, line_no: usize) -> Result<Corner, LoadError> {
    let mut slots = token.split('/');
    let mut next_index = |slot: &str| -> Result<u32, LoadError> {
        match slots.next() {
            Some(part) if !part.is_empty() => Ok(part.parse()?),
            _ => Err(LoadError::MalformedFace {
                line: line_no,
                reason: format!("corner \"{}\" is missing its {} index", token, slot),
            }),
        }
    };

    let position = next_index("position")?;
    let uv = next_index("uv")?;
    let normal = next_index("normal")?;

    Ok(Corner {
        position,
        uv,
        normal,
    })
}
