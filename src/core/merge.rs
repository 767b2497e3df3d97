/*
 * The merge engine. Given assembled profiles and one export group's worth of
 * selections (profile titles plus resource keys), it produces a single
 * deduplicated, conflict-resolved `MergedDocument`.
 *
 * Category rules:
 * - extensions: union by identifier id, first occurrence wins, only
 *   identifier and display name reach the archive.
 * - settings: shallow object merge in profile order, later keys overwrite.
 * - keybindings: concatenation deduplicated by the (key, command) composite,
 *   first occurrence wins regardless of differing `when` clauses.
 * - snippets: keyed by file name; byte-identical content under any name is
 *   dropped, a name collision with different content is renamed with a
 *   random prefix retried until unique within the group.
 *
 * Iteration order is deterministic: profile list order, then category order,
 * then resource order within a category, which is what makes "first wins"
 * reproducible. A resource failing to read or parse is logged, attributed to
 * its profile and category, and skipped; only an entirely empty result is a
 * hard failure.
 */
use crate::core::checksum_utils;
use crate::core::file_system::FileSystemOperations;
use crate::core::json_utils;
use crate::core::keygen::RandomKeyGenerator;
use crate::core::models::{ArchivedExtension, ExportGroup, MergedDocument, Profile};
use crate::core::reader;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug)]
pub enum MergeError {
    /// Every selected group resolved to zero archive sections.
    NothingSelected,
    Serialize(serde_json::Error),
}

impl From<serde_json::Error> for MergeError {
    fn from(err: serde_json::Error) -> Self {
        MergeError::Serialize(err)
    }
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeError::NothingSelected => write!(f, "No data selected for export"),
            MergeError::Serialize(e) => write!(f, "Archive serialization error: {e}"),
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// In-flight merge state for one export group.
#[derive(Default)]
struct MergeAccumulator {
    extensions: Vec<ArchivedExtension>,
    settings: serde_json::Map<String, Value>,
    keybindings: Vec<Value>,
    snippets: BTreeMap<String, String>,
    snippet_hashes: HashSet<String>,
}

pub struct MergeEngine<'a> {
    fs: &'a dyn FileSystemOperations,
    renamer: RandomKeyGenerator,
}

impl<'a> MergeEngine<'a> {
    pub fn new(fs: &'a dyn FileSystemOperations) -> Self {
        MergeEngine {
            fs,
            renamer: RandomKeyGenerator::snippet_prefixes(),
        }
    }

    /*
     * Merges every profile that has a matching export group into one
     * document. Profiles are visited in assembly order; a profile without a
     * group entry contributes nothing. The returned document carries an
     * empty name; the export writer fills it in from the destination.
     */
    pub fn merge(&self, profiles: &[Profile], groups: &[ExportGroup]) -> Result<MergedDocument> {
        let mut acc = MergeAccumulator::default();
        for profile in profiles {
            if let Some(group) = groups.iter().find(|g| g.title == profile.title) {
                self.merge_profile(&mut acc, profile, &group.keys);
            }
        }
        self.build_document(acc)
    }

    fn merge_profile(&self, acc: &mut MergeAccumulator, profile: &Profile, keys: &[String]) {
        log::debug!(
            "MergeEngine: Merging profile '{}' with {} selected key(s)",
            profile.title,
            keys.len()
        );
        let selected = |key: &str| keys.iter().any(|k| k == key);

        for extension in profile.extensions.iter().filter(|e| selected(&e.key)) {
            let already_present = acc
                .extensions
                .iter()
                .any(|existing| existing.identifier.id == extension.identifier.id);
            if !already_present {
                acc.extensions.push(ArchivedExtension {
                    identifier: extension.identifier.clone(),
                    display_name: extension.display_name.clone(),
                });
            }
        }

        for resource in profile.settings.iter().filter(|r| selected(&r.key)) {
            match reader::read_settings(self.fs, &resource.path) {
                Ok(map) => {
                    for (key, value) in map {
                        acc.settings.insert(key, value);
                    }
                }
                Err(e) => log::warn!(
                    "MergeEngine: Skipping settings of '{}': {e}",
                    profile.title
                ),
            }
        }

        for resource in profile.keybindings.iter().filter(|r| selected(&r.key)) {
            match reader::read_keybindings(self.fs, &resource.path) {
                Ok(entries) => {
                    for entry in entries {
                        let duplicate = acc.keybindings.iter().any(|existing| {
                            existing.get("key") == entry.get("key")
                                && existing.get("command") == entry.get("command")
                        });
                        if !duplicate {
                            acc.keybindings.push(entry);
                        }
                    }
                }
                Err(e) => log::warn!(
                    "MergeEngine: Skipping keybindings of '{}': {e}",
                    profile.title
                ),
            }
        }

        for resource in profile.snippets.iter().filter(|r| selected(&r.key)) {
            match reader::read_snippet_text(self.fs, &resource.path) {
                Ok(content) => self.merge_snippet(acc, &resource.name, content),
                Err(e) => log::warn!(
                    "MergeEngine: Skipping snippet '{}' of '{}': {e}",
                    resource.name,
                    profile.title
                ),
            }
        }
    }

    fn merge_snippet(&self, acc: &mut MergeAccumulator, name: &str, content: String) {
        // Content dedup first: identical bytes under any name are dropped.
        if !acc
            .snippet_hashes
            .insert(checksum_utils::sha256_hex(&content))
        {
            log::debug!("MergeEngine: Dropping duplicate snippet content '{name}'");
            return;
        }

        if acc.snippets.contains_key(name) {
            let prefix = self
                .renamer
                .generate_unique(|p| acc.snippets.contains_key(&format!("{p}{name}")));
            let renamed = format!("{prefix}{name}");
            log::debug!("MergeEngine: Renaming colliding snippet '{name}' to '{renamed}'");
            acc.snippets.insert(renamed, content);
        } else {
            acc.snippets.insert(name.to_string(), content);
        }
    }

    /*
     * Builds the archive document from the accumulated state. Each populated
     * category becomes a JSON-encoded string section; settings and
     * keybindings additionally nest a 4-space pretty-printed payload inside
     * their wrapper object, matching the editor's archive convention.
     */
    fn build_document(&self, acc: MergeAccumulator) -> Result<MergedDocument> {
        let mut document = MergedDocument {
            name: String::new(),
            extensions: None,
            settings: None,
            keybindings: None,
            snippets: None,
        };

        if !acc.extensions.is_empty() {
            document.extensions = Some(serde_json::to_string(&acc.extensions)?);
        }
        if !acc.settings.is_empty() {
            let inner = json_utils::to_pretty_4(&Value::Object(acc.settings))?;
            document.settings = Some(serde_json::to_string(&json!({ "settings": inner }))?);
        }
        if !acc.keybindings.is_empty() {
            let inner = json_utils::to_pretty_4(&acc.keybindings)?;
            document.keybindings = Some(serde_json::to_string(&json!({ "keybindings": inner }))?);
        }
        if !acc.snippets.is_empty() {
            document.snippets = Some(serde_json::to_string(&json!({ "snippets": acc.snippets }))?);
        }

        if document.section_count() == 0 {
            log::warn!("MergeEngine: Merge produced no sections, aborting");
            return Err(MergeError::NothingSelected);
        }
        Ok(document)
    }
}
