/*
 * Core data structures for profile export sessions. These model both what is
 * read from the editor's user-data directory (the profile catalog in
 * `storage.json`, installed-extension manifest entries) and what the rest of
 * the pipeline produces (assembled `Profile` snapshots, export selections,
 * and the merged `.code-profile` archive document).
 *
 * Everything that crosses the host-bridge or lands in the archive derives
 * Serialize/Deserialize with the camelCase field names the archive format
 * and the webview vocabulary use.
 */
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resource categories a profile is resolved from, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCategory {
    Extensions,
    Settings,
    Keybindings,
    Snippets,
}

impl std::fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceCategory::Extensions => "extensions",
            ResourceCategory::Settings => "settings",
            ResourceCategory::Keybindings => "keybindings",
            ResourceCategory::Snippets => "snippets",
        };
        write!(f, "{name}")
    }
}

// Discriminates the two discoverable resource shapes. Serialized as the
// webview-facing `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Extension,
}

/// Extension identity as recorded by the editor's extension manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub id: String,
    #[serde(default)]
    pub uuid: String,
}

/*
 * One settings file, keybindings file, or snippet file discovered for a
 * profile. `key` is a session-scoped random identifier minted at discovery
 * time so the UI can reference the resource without re-resolving its path;
 * it is never persisted. `is_default` records whether the file came from the
 * shared global location rather than a profile-specific override.
 */
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResource {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    #[serde(rename = "fsPath")]
    pub path: PathBuf,
    pub is_default: bool,
}

/// One installed extension bound to a profile, with its localized display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionResource {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub identifier: Identifier,
    pub display_name: String,
}

/// Per-category fallback flags from the profile catalog. A `true` flag means
/// the profile reads that category from the shared global location instead of
/// its own override directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseDefaultFlags {
    #[serde(default)]
    pub settings: bool,
    #[serde(default)]
    pub keybindings: bool,
    #[serde(default)]
    pub snippets: bool,
    #[serde(default)]
    pub tasks: bool,
    #[serde(default)]
    pub extensions: bool,
}

impl UseDefaultFlags {
    /// Flags of the synthetic "Default" profile: everything global.
    pub fn all_default() -> Self {
        UseDefaultFlags {
            settings: true,
            keybindings: true,
            snippets: true,
            tasks: true,
            extensions: true,
        }
    }
}

/*
 * One entry of `globalStorage/storage.json`'s `userDataProfiles` catalog.
 * `location` is the directory name under `<user-root>/profiles/` holding the
 * profile's override files. The synthetic default profile uses an empty
 * location and never resolves an override path because all its flags are set.
 */
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataProfile {
    pub location: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub use_default_flags: UseDefaultFlags,
}

impl UserDataProfile {
    /// The synthetic baseline profile, always prepended to the catalog so the
    /// global configuration can be exported even when no named profile exists.
    pub fn synthetic_default() -> Self {
        UserDataProfile {
            location: String::new(),
            name: "Default".to_string(),
            icon: None,
            is_default: true,
            use_default_flags: UseDefaultFlags::all_default(),
        }
    }
}

/// Shape of `<user-root>/globalStorage/storage.json`, reduced to the part
/// this tool consumes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStorage {
    #[serde(default)]
    pub user_data_profiles: Vec<UserDataProfile>,
}

/// One entry of an `extensions.json` manifest (global or per-profile).
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionRecord {
    pub identifier: Identifier,
    #[serde(default)]
    pub location: ExtensionLocation,
    #[serde(default)]
    pub metadata: ExtensionMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionLocation {
    #[serde(default)]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMetadata {
    #[serde(default)]
    pub is_application_scoped: bool,
}

/*
 * A fully resolved, in-memory snapshot of one editor profile. Immutable once
 * assembled; lives for a single export session. `settings` and `keybindings`
 * hold at most one element (the single global-or-override file); absent
 * files are simply omitted, never represented as placeholder entries.
 */
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub title: String,
    pub is_default: bool,
    pub use_default_flags: UseDefaultFlags,
    pub settings: Vec<FileResource>,
    pub keybindings: Vec<FileResource>,
    pub snippets: Vec<FileResource>,
    pub extensions: Vec<ExtensionResource>,
}

impl Profile {
    /// All resource keys of this profile, used when the caller wants to
    /// export a profile in full without narrowing the selection.
    pub fn all_resource_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        keys.extend(self.extensions.iter().map(|e| e.key.clone()));
        keys.extend(self.settings.iter().map(|r| r.key.clone()));
        keys.extend(self.keybindings.iter().map(|r| r.key.clone()));
        keys.extend(self.snippets.iter().map(|r| r.key.clone()));
        keys
    }
}

/// How the user wants multiple selected profiles written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// All selected profiles merged into one archive.
    Merge,
    /// One archive per selected profile.
    Single,
}

/// One export group: a profile title plus the resource keys to include from
/// that profile. "merge" mode passes every group to one merge call; "single"
/// mode runs one merge call per group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportGroup {
    pub title: String,
    pub keys: Vec<String>,
}

/*
 * The `.code-profile` archive payload: a name plus up to four independently
 * optional sections, each itself a JSON-encoded string (the archive nests
 * serialized JSON inside the outer JSON envelope, mirroring the editor's own
 * convention). At least one section must be present; the merge engine rejects
 * an all-empty result before a document is ever built.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keybindings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippets: Option<String>,
}

impl MergedDocument {
    pub fn section_count(&self) -> usize {
        [
            self.extensions.is_some(),
            self.settings.is_some(),
            self.keybindings.is_some(),
            self.snippets.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Archive section entry for an exported extension. Internal bookkeeping
/// fields (resource key, type tag) never leak into the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedExtension {
    pub identifier: Identifier,
    pub display_name: String,
}
