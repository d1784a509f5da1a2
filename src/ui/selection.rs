//! Files chosen for upload.
//!
//! Picked or dropped paths are turned into an ordered list of regular files.
//! Directories are walked recursively so dropping a folder selects its contents.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Full path on disk
    pub path: PathBuf,
    /// Display name, also sent as the multipart filename
    pub name: String,
}

impl SelectedFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// Expand picked or dropped paths into the files to upload.
///
/// Top-level order is preserved. Directories contribute their regular files,
/// sorted by name at every level. Unreadable entries are skipped.
pub fn expand_paths<I, P>(paths: I) -> Vec<SelectedFile>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();

        if !path.is_dir() {
            files.push(SelectedFile::new(path.to_path_buf()));
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    files.push(SelectedFile::new(entry.into_path()));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable entry under {:?}: {}", path, e),
            }
        }
    }

    files
}
