//! Extra folders inside a freshly created project

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SfpError, Result};

/// Create each folder directly under `project_dir`
///
/// Folders are created one level deep only, so an already existing folder or
/// a missing project directory is reported as an error.
pub fn create_additional_folders(project_dir: &Path, folders: &[String]) -> Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(folders.len());
    for folder in folders {
        let path = project_dir.join(folder);
        fs::create_dir(&path)
            .map_err(|e| SfpError::FolderCreation(format!("{}: {}", path.display(), e)))?;
        created.push(path);
    }
    Ok(created)
}
