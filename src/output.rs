use crate::error::OutputError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Deletes `dir` if it exists and creates it again, empty.
pub fn prepare_output_dir(dir: &Path) -> Result<(), OutputError> {
    let prepare_err = |source| OutputError::Prepare {
        path: dir.to_path_buf(),
        source,
    };
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(prepare_err)?;
    }
    fs::create_dir_all(dir).map_err(prepare_err)
}

/// Writes `contents` to `dir/file_name` through a temporary file in the same
/// directory, so the artifact is never observed half-written.
pub fn write_artifact(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, OutputError> {
    let path = dir.join(file_name);
    let write_err = |source| OutputError::Write {
        path: path.clone(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.persist(&path).map_err(|err| write_err(err.error))?;
    log::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(path)
}

/// Recreates `dir` and writes the single generated artifact into it.
pub fn replace_output(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, OutputError> {
    prepare_output_dir(dir)?;
    write_artifact(dir, file_name, contents)
}
