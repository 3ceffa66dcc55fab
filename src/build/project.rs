// ABOUTME: Project file discovery for the publish toolchain.
// ABOUTME: Exactly one *.csproj must exist at the top level, or else in one child directory level.

use super::BuildError;
use std::path::{Path, PathBuf};

const PROJECT_EXTENSION: &str = "csproj";

/// A buildable project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    path: PathBuf,
    name: String,
}

impl ProjectFile {
    fn new(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Project name: the file name without extension.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Find the single project file under `source_dir`.
///
/// The top level is searched first. Only when it has no candidates are the
/// immediate subdirectories searched. More than one candidate at the level
/// where matches are found is an error rather than an arbitrary pick.
pub fn find_project(source_dir: &Path) -> Result<ProjectFile, BuildError> {
    if !source_dir.is_dir() {
        return Err(BuildError::ProjectNotFound {
            directory: source_dir.to_path_buf(),
        });
    }

    let mut candidates = project_files_in(source_dir)?;

    if candidates.is_empty() {
        for entry in std::fs::read_dir(source_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                candidates.extend(project_files_in(&path)?);
            }
        }
    }

    candidates.sort();
    match candidates.len() {
        0 => Err(BuildError::ProjectNotFound {
            directory: source_dir.to_path_buf(),
        }),
        1 => Ok(ProjectFile::new(candidates.remove(0))),
        _ => Err(BuildError::AmbiguousProject {
            directory: source_dir.to_path_buf(),
            candidates: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }),
    }
}

fn project_files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == PROJECT_EXTENSION) {
            found.push(path);
        }
    }
    Ok(found)
}
