/*
 * This module consolidates the core, host-agnostic logic of the exporter:
 * data models, filesystem abstraction (`FileSystemOperations`), the resource
 * locator and reader, the profile assembler, the merge engine, and the
 * archive writer, plus small utilities for tolerant JSON, random keys, and
 * content checksums.
 */
pub mod assembler;
pub mod checksum_utils;
pub mod exporter;
pub mod file_system;
pub mod json_utils;
pub mod keygen;
pub mod locator;
pub mod merge;
pub mod models;
pub mod reader;

// Re-export key data structures
pub use models::{
    ArchivedExtension, ExportGroup, ExportMode, ExtensionRecord, ExtensionResource, FileResource,
    Identifier, MergedDocument, Profile, ProfileStorage, ResourceCategory, ResourceKind,
    UseDefaultFlags, UserDataProfile,
};

// Re-export file system related items
pub use file_system::{CoreFileSystem, DirEntryInfo, FileSystemError, FileSystemOperations};

// Re-export the locator / reader / assembler pipeline
pub use assembler::ProfileAssembler;
pub use locator::{ResolvedLocation, ResourceLocator};
pub use reader::{InstalledExtensionsOperations, NoLiveExtensions};

// Re-export merge and export items
pub use exporter::{CODE_PROFILE_FILE_EXT, ExportWriter, ExporterError};
pub use merge::{MergeEngine, MergeError};

pub use keygen::RandomKeyGenerator;
