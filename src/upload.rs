//! Upload boundary: filesystem paths to in-memory `(name, bytes)` pairs.
//!
//! The library core never touches the filesystem; this module feeds it.
//! Explicit file arguments are read as-is (decode validation happens at the
//! session boundary, the same way a browser's native decode is the only
//! format check). Directories are walked recursively and filtered by the
//! extensions the codec has decoders for.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions with compiled-in decoders, matching the accepted upload formats.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no image files found under the given paths")]
    NoInputs,
}

/// One file handed to the session's upload call.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_file(path: &Path) -> Result<UploadFile, UploadError> {
    let bytes = fs::read(path).map_err(|source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(UploadFile {
        name: file_name(path),
        bytes,
    })
}

/// Gather upload files from a mix of file and directory paths.
///
/// Files are taken verbatim; directories are walked recursively with
/// non-image extensions skipped. Returns the files in argument order, with
/// directory contents sorted by path for deterministic tray ordering.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<UploadFile>, UploadError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| has_supported_extension(p))
                .collect();
            found.sort();
            for file in &found {
                files.push(read_file(file)?);
            }
            log::debug!("collected {} images under {}", found.len(), path.display());
        } else {
            files.push(read_file(path)?);
        }
    }

    if files.is_empty() {
        return Err(UploadError::NoInputs);
    }
    Ok(files)
}
