/*
 * This module loads raw resource content for the categories a profile is
 * built from: tolerant JSON for settings, keybinding lists, and extension
 * manifests; raw text for snippets (byte-preserving, so archived snippets
 * round-trip losslessly); and localized display-name resolution for
 * extensions.
 *
 * Display names fall back through a fixed chain: a live installed-extension
 * record for the same identifier, the extension's own `package.json`
 * (resolving `%key%` localization placeholders through the adjacent
 * `package.nls.json`), then `<publisher>.<name>`, and finally the bare
 * identifier string. The live registry is an external collaborator behind
 * `InstalledExtensionsOperations`; the CLI runs without one.
 */
use crate::core::file_system::{self, FileSystemOperations};
use crate::core::models::ExtensionRecord;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const PACKAGE_MANIFEST_FILENAME: &str = "package.json";
const PACKAGE_NLS_FILENAME: &str = "package.nls.json";

/// Live installed-extension registry. Inside an editor host this would be
/// backed by the running extension list; standalone runs use `NoLiveExtensions`.
pub trait InstalledExtensionsOperations: Send + Sync {
    /// Display name recorded for a currently installed extension, if any.
    fn display_name(&self, extension_id: &str) -> Option<String>;
}

/// Registry for standalone runs: nothing is live.
pub struct NoLiveExtensions {}

impl NoLiveExtensions {
    pub fn new() -> Self {
        NoLiveExtensions {}
    }
}

impl Default for NoLiveExtensions {
    fn default() -> Self {
        Self::new()
    }
}

impl InstalledExtensionsOperations for NoLiveExtensions {
    fn display_name(&self, _extension_id: &str) -> Option<String> {
        None
    }
}

/// The slice of an extension's `package.json` display-name resolution needs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Reads an `extensions.json` manifest. A missing file is an empty list;
/// malformed content is an error for the caller to attribute and skip.
pub fn read_extension_records(
    fs: &dyn FileSystemOperations,
    manifest_path: &Path,
) -> file_system::Result<Vec<ExtensionRecord>> {
    if !fs.exists(manifest_path) {
        log::trace!("ResourceReader: No extension manifest at {manifest_path:?}");
        return Ok(Vec::new());
    }
    file_system::read_json_as(fs, manifest_path)
}

/*
 * Resolves the display name for one extension manifest record.
 *
 * A record whose extension directory carries no `package.json` resolves to
 * the bare identifier id. A manifest `displayName` wrapped in percent signs
 * is a localization placeholder; the key (percent signs stripped) is looked
 * up in `package.nls.json` next to the manifest, and a missing side-file or
 * key falls back to `<publisher>.<name>`.
 */
pub fn resolve_display_name(
    fs: &dyn FileSystemOperations,
    live: &dyn InstalledExtensionsOperations,
    record: &ExtensionRecord,
) -> String {
    let id = &record.identifier.id;

    if let Some(name) = live.display_name(id) {
        return name;
    }

    let manifest_path = record.location.path.join(PACKAGE_MANIFEST_FILENAME);
    if !fs.exists(&manifest_path) {
        log::debug!("ResourceReader: No package manifest for '{id}', using id as display name");
        return id.clone();
    }

    let mut manifest: PackageManifest = match file_system::read_json_as(fs, &manifest_path) {
        Ok(m) => m,
        Err(e) => {
            log::warn!("ResourceReader: Unreadable package manifest for '{id}': {e}");
            return id.clone();
        }
    };

    if let Some(display_name) = manifest.display_name.as_deref() {
        if is_localization_placeholder(display_name) {
            let nls_key = display_name[1..display_name.len() - 1].to_string();
            manifest.display_name = lookup_nls_key(fs, &record.location.path, id, &nls_key);
        }
    }

    match manifest.display_name {
        Some(name) => name,
        None => match (manifest.publisher, manifest.name) {
            (Some(publisher), Some(name)) => format!("{publisher}.{name}"),
            _ => id.clone(),
        },
    }
}

fn is_localization_placeholder(display_name: &str) -> bool {
    display_name.len() >= 2 && display_name.starts_with('%') && display_name.ends_with('%')
}

fn lookup_nls_key(
    fs: &dyn FileSystemOperations,
    extension_dir: &Path,
    id: &str,
    key: &str,
) -> Option<String> {
    let nls_path = extension_dir.join(PACKAGE_NLS_FILENAME);
    if !fs.exists(&nls_path) {
        return None;
    }
    match file_system::read_json_as::<HashMap<String, String>>(fs, &nls_path) {
        Ok(nls) => nls.get(key).cloned(),
        Err(e) => {
            log::warn!("ResourceReader: Unreadable localization side-file for '{id}': {e}");
            None
        }
    }
}

/// Reads a settings file as a JSON object map. Non-object top levels are
/// rejected so the merge engine only ever shallow-merges objects.
pub fn read_settings(
    fs: &dyn FileSystemOperations,
    path: &Path,
) -> file_system::Result<serde_json::Map<String, Value>> {
    match fs.read_json(path)? {
        Value::Object(map) => Ok(map),
        other => Err(file_system::FileSystemError::Json(
            path.to_path_buf(),
            serde::de::Error::custom(format!(
                "expected a settings object, found {}",
                json_type_name(&other)
            )),
        )),
    }
}

/// Reads a keybindings file as a list of entries. Entries keep whatever
/// fields they carry (`args` and friends survive the merge untouched).
pub fn read_keybindings(
    fs: &dyn FileSystemOperations,
    path: &Path,
) -> file_system::Result<Vec<Value>> {
    match fs.read_json(path)? {
        Value::Array(entries) => Ok(entries),
        other => Err(file_system::FileSystemError::Json(
            path.to_path_buf(),
            serde::de::Error::custom(format!(
                "expected a keybindings list, found {}",
                json_type_name(&other)
            )),
        )),
    }
}

/// Reads a snippet file as raw text. No parse, no re-serialization: the
/// archive stores the exact bytes so the content survives a round trip.
pub fn read_snippet_text(
    fs: &dyn FileSystemOperations,
    path: &Path,
) -> file_system::Result<String> {
    fs.read_text(path)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_system::CoreFileSystem;
    use crate::core::models::{ExtensionLocation, ExtensionMetadata, Identifier};
    use std::fs;
    use tempfile::tempdir;

    fn record_at(dir: &Path, id: &str) -> ExtensionRecord {
        ExtensionRecord {
            identifier: Identifier {
                id: id.to_string(),
                uuid: String::new(),
            },
            location: ExtensionLocation {
                path: dir.to_path_buf(),
            },
            metadata: ExtensionMetadata::default(),
        }
    }

    struct FixedLiveRegistry(&'static str, &'static str);

    impl InstalledExtensionsOperations for FixedLiveRegistry {
        fn display_name(&self, extension_id: &str) -> Option<String> {
            (extension_id == self.0).then(|| self.1.to_string())
        }
    }

    #[test]
    fn live_registry_record_wins_over_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "displayName": "From Manifest" }"#,
        )
        .unwrap();
        let fs_ops = CoreFileSystem::new();
        let live = FixedLiveRegistry("pub.ext", "From Registry");

        let name = resolve_display_name(&fs_ops, &live, &record_at(dir.path(), "pub.ext"));
        assert_eq!(name, "From Registry");
    }

    #[test]
    fn missing_manifest_falls_back_to_identifier() {
        let dir = tempdir().unwrap();
        let fs_ops = CoreFileSystem::new();
        let name = resolve_display_name(
            &fs_ops,
            &NoLiveExtensions::new(),
            &record_at(dir.path(), "pub.ext"),
        );
        assert_eq!(name, "pub.ext");
    }

    #[test]
    fn plain_manifest_display_name_is_used() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "displayName": "Nice Name", "publisher": "pub", "name": "ext" }"#,
        )
        .unwrap();
        let fs_ops = CoreFileSystem::new();
        let name = resolve_display_name(
            &fs_ops,
            &NoLiveExtensions::new(),
            &record_at(dir.path(), "pub.ext"),
        );
        assert_eq!(name, "Nice Name");
    }

    #[test]
    fn localization_placeholder_resolves_through_nls_side_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "displayName": "%ext.displayName%", "publisher": "pub", "name": "ext" }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("package.nls.json"),
            r#"{ "ext.displayName": "Localized Name" }"#,
        )
        .unwrap();
        let fs_ops = CoreFileSystem::new();
        let name = resolve_display_name(
            &fs_ops,
            &NoLiveExtensions::new(),
            &record_at(dir.path(), "pub.ext"),
        );
        assert_eq!(name, "Localized Name");
    }

    #[test]
    fn missing_nls_key_falls_back_to_publisher_dot_name() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "displayName": "%missing.key%", "publisher": "pub", "name": "ext" }"#,
        )
        .unwrap();
        fs::write(dir.path().join("package.nls.json"), "{}").unwrap();
        let fs_ops = CoreFileSystem::new();
        let name = resolve_display_name(
            &fs_ops,
            &NoLiveExtensions::new(),
            &record_at(dir.path(), "pub.ext"),
        );
        assert_eq!(name, "pub.ext");
    }

    #[test]
    fn missing_nls_side_file_falls_back_to_publisher_dot_name() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "displayName": "%key%", "publisher": "acme", "name": "tool" }"#,
        )
        .unwrap();
        let fs_ops = CoreFileSystem::new();
        let name = resolve_display_name(
            &fs_ops,
            &NoLiveExtensions::new(),
            &record_at(dir.path(), "acme.tool"),
        );
        assert_eq!(name, "acme.tool");
    }

    #[test]
    fn missing_extension_manifest_file_yields_empty_record_list() {
        let dir = tempdir().unwrap();
        let fs_ops = CoreFileSystem::new();
        let records =
            read_extension_records(&fs_ops, &dir.path().join("extensions.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn settings_must_be_an_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let fs_ops = CoreFileSystem::new();
        assert!(read_settings(&fs_ops, &path).is_err());
    }

    #[test]
    fn keybindings_accept_comments_and_preserve_extra_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keybindings.json");
        fs::write(
            &path,
            "[\n  // my binding\n  { \"key\": \"ctrl+k\", \"command\": \"x\", \"args\": {\"n\": 1} },\n]",
        )
        .unwrap();
        let fs_ops = CoreFileSystem::new();
        let entries = read_keybindings(&fs_ops, &path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["args"]["n"], 1);
    }

    #[test]
    fn snippet_text_is_read_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rust.json");
        let content = "{\n\t// snippet comment kept as-is\n\t\"main\": {}\n}";
        fs::write(&path, content).unwrap();
        let fs_ops = CoreFileSystem::new();
        assert_eq!(read_snippet_text(&fs_ops, &path).unwrap(), content);
    }
}
