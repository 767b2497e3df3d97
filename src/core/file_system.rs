/*
 * This module provides the filesystem primitives the export pipeline needs:
 * existence checks, text and tolerant-JSON reads, text writes, and
 * non-recursive directory listing. It defines errors specific to these
 * operations, a trait (`FileSystemOperations`) for abstracting the access so
 * tests can substitute mock implementations, and a concrete implementation
 * (`CoreFileSystem`) backed by `std::fs`.
 */
use crate::core::json_utils;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum FileSystemError {
    Io(PathBuf, io::Error),
    Json(PathBuf, serde_json::Error),
}

impl std::fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSystemError::Io(path, e) => write!(f, "I/O error at {path:?}: {e}"),
            FileSystemError::Json(path, e) => write!(f, "JSON error in {path:?}: {e}"),
        }
    }
}

impl std::error::Error for FileSystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileSystemError::Io(_, e) => Some(e),
            FileSystemError::Json(_, e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

/// A directory child as reported by `list_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_file: bool,
}

pub trait FileSystemOperations: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_text(&self, path: &Path) -> Result<String>;
    /// Reads a file as JSON-with-comments into a generic value. Malformed
    /// content is an error for that single file only; callers decide whether
    /// it aborts anything larger.
    fn read_json(&self, path: &Path) -> Result<serde_json::Value>;
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;
    /// Lists direct children of a directory, sorted by name for deterministic
    /// downstream iteration. Never recurses.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;
}

/// Reads a JSON-with-comments file straight into a deserializable shape.
/// Free-standing so `FileSystemOperations` stays object-safe.
pub fn read_json_as<T: serde::de::DeserializeOwned>(
    fs: &dyn FileSystemOperations,
    path: &Path,
) -> Result<T> {
    let value = fs.read_json(path)?;
    serde_json::from_value(value).map_err(|e| FileSystemError::Json(path.to_path_buf(), e))
}

pub struct CoreFileSystem {}

impl CoreFileSystem {
    pub fn new() -> Self {
        CoreFileSystem {}
    }
}

impl Default for CoreFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemOperations for CoreFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        log::trace!("CoreFileSystem: Reading text from {path:?}");
        fs::read_to_string(path).map_err(|e| FileSystemError::Io(path.to_path_buf(), e))
    }

    fn read_json(&self, path: &Path) -> Result<serde_json::Value> {
        let text = self.read_text(path)?;
        json_utils::parse_tolerant(&text)
            .map_err(|e| FileSystemError::Json(path.to_path_buf(), e))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        log::debug!("CoreFileSystem: Writing {} bytes to {path:?}", content.len());
        fs::write(path, content).map_err(|e| FileSystemError::Io(path.to_path_buf(), e))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let read_dir = fs::read_dir(path).map_err(|e| FileSystemError::Io(path.to_path_buf(), e))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| FileSystemError::Io(path.to_path_buf(), e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| FileSystemError::Io(entry.path(), e))?;
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_file: file_type.is_file(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
