use std::path::Path;

use log::debug;
use serde::Deserialize;

use super::super::LoadError;

/// Per-file import tweaks, read from a `<stem>.toml` next to the model or
/// a folder-scoped `obj.toml`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub(crate) struct ImportMeta {
    /// Negate the given axes of positions and normals while they are
    /// pooled, for sources authored in a mirrored coordinate system.
    pub(crate) flip_axis: [bool; 3],
}

impl ImportMeta {
    fn read(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }

    /// Meta for `model_path`: file-scoped first, then folder-scoped,
    /// then the defaults.
    pub(crate) fn resolve(model_path: &Path) -> Result<Self, LoadError> {
        let dir = match model_path.parent() {
            Some(dir) => dir,
            None => return Ok(Self::default()),
        };

        for candidate in [model_path.with_extension("toml"), dir.join("obj.toml")] {
            if candidate.is_file() {
                debug!("Using import meta from {}", candidate.display());
                return Self::read(&candidate);
            }
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_meta_files_fall_back_to_defaults() {
        let meta: ImportMeta = toml::from_str("flip_axis = [true, false, true]").unwrap();
        assert_eq!(meta.flip_axis, [true, false, true]);

        let empty: ImportMeta = toml::from_str("").unwrap();
        assert_eq!(empty.flip_axis, [false, false, false]);
    }
}
