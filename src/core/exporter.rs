/*
 * The export writer: serializes a merged document into the `.code-profile`
 * archive envelope (UTF-8, 4-space-indented JSON) and persists it through
 * the filesystem abstraction. Also owns the archive naming conventions: a
 * merged export is named after the destination file's stem, a single-profile
 * export after the profile title.
 */
use crate::core::file_system::{FileSystemError, FileSystemOperations};
use crate::core::json_utils;
use crate::core::models::{ExportGroup, MergedDocument};
use std::path::{Path, PathBuf};

pub const CODE_PROFILE_FILE_EXT: &str = "code-profile";

#[derive(Debug)]
pub enum ExporterError {
    Fs(FileSystemError),
    Serialize(serde_json::Error),
}

impl From<FileSystemError> for ExporterError {
    fn from(err: FileSystemError) -> Self {
        ExporterError::Fs(err)
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialize(err)
    }
}

impl std::fmt::Display for ExporterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExporterError::Fs(e) => write!(f, "Archive write error: {e}"),
            ExporterError::Serialize(e) => write!(f, "Archive serialization error: {e}"),
        }
    }
}

impl std::error::Error for ExporterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExporterError::Fs(e) => Some(e),
            ExporterError::Serialize(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;

/// Default file name offered for a merged export: the group titles joined
/// with " + ", carrying the archive extension.
pub fn default_merge_file_name(groups: &[ExportGroup]) -> String {
    let joined = groups
        .iter()
        .map(|g| g.title.as_str())
        .collect::<Vec<_>>()
        .join(" + ");
    format!("{joined}.{CODE_PROFILE_FILE_EXT}")
}

/// Destination of a single-profile export inside a chosen folder.
pub fn profile_destination(folder: &Path, title: &str) -> PathBuf {
    folder.join(format!("{title}.{CODE_PROFILE_FILE_EXT}"))
}

/// Archive name derived from a destination path: the base name without its
/// extension.
pub fn document_name_from(destination: &Path) -> String {
    destination
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub struct ExportWriter<'a> {
    fs: &'a dyn FileSystemOperations,
}

impl<'a> ExportWriter<'a> {
    pub fn new(fs: &'a dyn FileSystemOperations) -> Self {
        ExportWriter { fs }
    }

    /*
     * Names the document after the destination's file stem, serializes the
     * envelope with 4-space indentation, and writes it. Returns the final
     * document so callers can report what was written.
     */
    pub fn write_document(
        &self,
        mut document: MergedDocument,
        destination: &Path,
    ) -> Result<MergedDocument> {
        document.name = document_name_from(destination);
        log::debug!(
            "ExportWriter: Writing archive '{}' to {destination:?}",
            document.name
        );
        let text = json_utils::to_pretty_4(&document)?;
        self.fs.write_text(destination, &text)?;
        Ok(document)
    }
}
