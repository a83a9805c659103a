//! Zip archive extraction.
//!
//! The whole archive is unpacked into the extraction directory before any log
//! is read. Existing files at the same paths are overwritten.

use std::fs::File;
use std::path::{Path, PathBuf};

/// Unpack `archive_path` into `dest`, creating `dest` if needed.
///
/// Returns the number of archive entries.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let entries = archive.len();

    std::fs::create_dir_all(dest).map_err(|e| ArchiveError::CreateDir {
        path: dest.to_path_buf(),
        source: e,
    })?;

    archive.extract(dest).map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        archive = %archive_path.display(),
        dest = %dest.display(),
        entries,
        "archive extracted"
    );
    Ok(entries)
}

/// Errors from archive extraction.
#[derive(Debug)]
pub enum ArchiveError {
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveError::Open { path, source } => {
                write!(f, "failed to open archive {}: {source}", path.display())
            }
            ArchiveError::CreateDir { path, source } => {
                write!(
                    f,
                    "failed to create extraction directory {}: {source}",
                    path.display()
                )
            }
            ArchiveError::Zip { path, source } => {
                write!(f, "failed to extract archive {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::Open { source, .. } => Some(source),
            ArchiveError::CreateDir { source, .. } => Some(source),
            ArchiveError::Zip { source, .. } => Some(source),
        }
    }
}

/// Build a zip archive from `(name, contents)` pairs. Test helper.
#[cfg(test)]
pub fn write_test_archive(path: &Path, files: &[(&str, &[u8])]) {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
}
