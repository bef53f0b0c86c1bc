use anyhow::{anyhow, Context, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

pub fn file_name(path: &Path) -> Result<&str> {
    path.file_stem()
        .ok_or_else(|| anyhow!("No file stem found: {}", path.display()))?
        .to_str()
        .ok_or_else(|| anyhow!("File stem is not valid unicode: {}", path.display()))
}

pub fn combine_path(directory: &Path, file_name: &str, extension: &str) -> PathBuf {
    directory.join(format!("{}.{}", file_name, extension))
}

pub fn write_file(target: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(target)
        .with_context(|| format!("Could not create file: {}", target.display()))?;
    file.write_all(data)
        .with_context(|| format!("Could not write data to file: {}", target.display()))?;
    Ok(())
}
