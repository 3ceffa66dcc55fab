// ABOUTME: Zips a publish output directory into a deployable archive.
// ABOUTME: The archive lives in a temp directory that is removed with the Package.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const ARCHIVE_NAME: &str = "package.zip";

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("source directory does not exist: {}", .directory.display())]
    SourceDirectoryMissing { directory: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("packaging task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A zip archive ready for upload. Dropping it deletes the archive.
#[derive(Debug)]
pub struct Package {
    archive_path: PathBuf,
    _workdir: TempDir,
}

impl Package {
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.archive_path).await
    }
}

/// Package `source_dir` into a fresh archive in its own temp directory.
pub async fn package_directory(source_dir: &Path) -> Result<Package, PackageError> {
    if !source_dir.is_dir() {
        return Err(PackageError::SourceDirectoryMissing {
            directory: source_dir.to_path_buf(),
        });
    }

    let workdir = tempfile::Builder::new()
        .prefix("azdeploy-package-")
        .tempdir()?;
    let archive_path = workdir.path().join(ARCHIVE_NAME);

    let source = source_dir.to_path_buf();
    let dest = archive_path.clone();
    let entries = tokio::task::spawn_blocking(move || write_archive(&source, &dest)).await??;

    tracing::debug!(
        source = %source_dir.display(),
        archive = %archive_path.display(),
        entries,
        "packaged directory"
    );

    Ok(Package {
        archive_path,
        _workdir: workdir,
    })
}

/// Write every file under `source_dir` into a zip at `archive_path`, with
/// paths relative to `source_dir`. An existing archive is replaced.
/// Returns the number of entries written.
pub fn write_archive(source_dir: &Path, archive_path: &Path) -> Result<usize, PackageError> {
    if !source_dir.is_dir() {
        return Err(PackageError::SourceDirectoryMissing {
            directory: source_dir.to_path_buf(),
        });
    }

    if archive_path.exists() {
        std::fs::remove_file(archive_path)?;
    }

    let mut writer = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let dir_options = SimpleFileOptions::default().unix_permissions(0o755);

    let mut count = 0;
    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| PackageError::Walk {
            path: source_dir.to_path_buf(),
            source,
        })?;
        let Some(name) = archive_entry_name(source_dir, entry.path()) else {
            continue;
        };

        if entry.file_type().is_dir() {
            writer.add_directory(name, dir_options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, file_options)?;
            let mut file = File::open(entry.path())?;
            std::io::copy(&mut file, &mut writer)?;
        } else {
            continue;
        }
        count += 1;
    }

    writer.finish()?.flush()?;
    Ok(count)
}

/// Forward-slash path of `path` relative to `root`.
fn archive_entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
